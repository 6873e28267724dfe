//! Export adapter for Scene Forge.
//!
//! [`Exporter`] turns a finished scene into calls on a [`HostBridge`] and
//! asks the host to write the interchange file. [`RecordingHost`] is an
//! in-memory host that journals those calls.

pub mod export;
pub mod host;
pub mod realize;
pub mod recording;

pub use export::{ExportReport, ExportRequest, Exporter};
pub use host::{BoneData, HostBridge, HostHandle, HostResult, KeyframeData, TransformData};
pub use realize::{Realized, Timeline, realize};
pub use recording::{HostCommand, RecordingHost};
