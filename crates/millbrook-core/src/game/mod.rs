pub mod error;
pub mod match_state;
pub mod pipeline;
pub mod serialization;
pub mod session;

pub use error::MatchError;
pub use match_state::{MatchConfig, MatchState, MatchStatus};
pub use pipeline::HoleEntry;
pub use serialization::MatchSnapshot;
pub use session::MatchSession;
