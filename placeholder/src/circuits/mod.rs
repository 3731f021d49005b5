pub mod constraint_system;
pub mod domains;
pub mod expr;
pub mod gate;
pub mod polynomials;
pub mod table;
pub mod variable;
