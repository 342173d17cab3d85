pub mod attachments;
pub mod controller;
pub mod state;

pub use attachments::{AttachmentList, MAX_REFERENCE_FILES};
pub use controller::{GenerationController, SubmitOutcome};
pub use state::{WorkflowState, FAILURE_NOTICE};
