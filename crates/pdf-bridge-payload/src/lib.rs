mod bundle;
mod descriptor;
mod encode;
pub mod package;
pub mod transport;
mod types;

pub use bundle::{BundleSource, LazyBundle};
pub use descriptor::{
    DIRECT_SCHEMES, INLINE_PREFIX, SourceDescriptor, SourceRoute, is_direct_uri, is_inline_payload,
};
pub use encode::{DEFAULT_MEDIA_TYPE, EncodedPayload, PayloadEncoder, encode_data_url};
pub use package::{BoundaryPackager, Handoff, HandoffError, PackagedArtifact};
pub use transport::{DefaultTransport, FetchRequest, FetchedBody, Transport};
pub use types::*;
