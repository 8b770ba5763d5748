//! The four loops that drive the link.
//!
//! Each loop runs on its own task, exclusively owns its session (via
//! transmitter/receiver), its codec context, and its buffers, and
//! shares no mutable state with any other loop — the byte stream is
//! the only coupling. A loop suspends only at its blocking calls
//! (capture acquisition, session I/O, codec submit/drain) and checks
//! its cancellation token once per iteration.
//!
//! At most one framed unit is in transit per session at a time, since
//! transmit/receive block until their unit completes. A slow peer
//! therefore stalls the producing loop before it acquires the next
//! unit — backpressure bounds in-flight memory to one unit per
//! channel.
//!
//! Every loop-local error (I/O, parse, codec) is terminal for that
//! loop only: it is logged, the loop's resources are released by drop,
//! and no other loop is stopped automatically. The AV and Input
//! channels fail independently.

mod capture;
mod dispatch;
mod input_channel;
mod playback;

pub use capture::CapturePipeline;
pub use dispatch::InputDispatcher;
pub use input_channel::InputChannel;
pub use playback::PlaybackPipeline;
