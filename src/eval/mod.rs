pub mod evaluator;
pub mod promotion;
pub mod rebind;
pub mod window;
