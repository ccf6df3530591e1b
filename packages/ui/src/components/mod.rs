mod button;
mod card;
mod input;

pub use button::{Button, ButtonVariant};
pub use card::{Card, Spinner, StatCard};
pub use input::{Field, Input, Label, TextArea};
