/// Trait for outlines whose traversal direction can be reversed.
pub trait Invertible: Clone {
    fn invert(&mut self);
    fn inverse(&self) -> Self {
        let mut inv = self.clone();
        inv.invert();
        inv
    }
}
