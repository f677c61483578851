//! The built-in [`irmutant_ir::Operator`] catalogue.

mod conditionals_boundary;
mod math_add;
mod math_sub;
mod scan;

pub use conditionals_boundary::ConditionalsBoundary;
pub use math_add::MathAdd;
pub use math_sub::MathSub;

use irmutant_ir::Operator;

/// The full built-in catalogue, in the order mutation points are produced in.
pub fn default_catalogue() -> Vec<Box<dyn Operator>> {
    vec![Box::new(ConditionalsBoundary), Box::new(MathAdd), Box::new(MathSub)]
}
