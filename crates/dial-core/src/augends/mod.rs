//! Built-in augend rules.

mod case;
mod color;
mod constant;
mod date;
mod number;
mod user;

pub use case::{CaseAugend, CaseOptions, CaseStyle};
pub use color::{ColorAugend, ColorChannel, ColorOptions};
pub use constant::{ConstantAugend, ConstantOptions};
pub use date::{DateAugend, DateField, DateFormat, DateOptions};
pub use number::{NumberAugend, NumberOptions};
pub use user::{CallbackHost, UserAugend, UserOptions};
