pub mod persona;
pub mod session;

pub use persona::{PracticeMessage, PracticePersona, PracticeTurn};
pub use session::PracticeSession;
