mod assistant;
mod session;

pub use assistant::{AssistantState, assistant_router};
pub use session::{AdminKeyAuth, NoopSessions, SessionAuth, SessionRole};
