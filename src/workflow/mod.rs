pub mod host;
pub mod message;
pub mod sequencer;

pub use host::{HostAdapter, HostCall, RecordingHost};
pub use message::{Interaction, SequencerEvent, SequencerState, Transition};
pub use sequencer::Sequencer;
