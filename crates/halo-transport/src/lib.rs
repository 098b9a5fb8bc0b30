//! Point-to-point message transport for halo exchange workers.
//!
//! [`Transport`] is the seam between the exchange protocol and whatever
//! moves bytes between workers. It offers a synchronous (rendezvous)
//! send, a blocking receive, non-blocking issue of both, and a combined
//! wait over a set of outstanding requests.
//!
//! [`ChannelFabric`] is the in-process backend: one worker thread per
//! partition, with a zero-capacity `crossbeam-channel` per
//! `(sender, receiver, tag)` triple, so a send completes only once the
//! matching receive has started.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod channel;
pub mod transport;

pub use channel::{ChannelFabric, ChannelRequest, ChannelTransport};
pub use transport::{Completion, OperationKind, Transport};
