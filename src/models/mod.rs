pub mod category;
pub mod chat;
pub mod event;
pub mod event_user;
pub mod flash;
pub mod user;

pub use category::Category;
pub use chat::{Chat, ChatMessage};
pub use event::{Event, EventSummary};
pub use event_user::{Attendee, JoinOutcome, LeaveOutcome};
pub use flash::{FlashMessage, Level};
pub use user::User;
