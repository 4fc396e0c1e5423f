//! # Shared Constants
//!
//! Names, limits and defaults shared by every crate in the `metasync` workspace.

/// The maximum number of names the remote `readMetadata` call accepts per request.
pub const BATCH_LIMIT: usize = 10;

/// The record type handled by this workspace.
pub const PROFILE_TYPE: &str = "Profile";

/// The namespace carried by the root element of every metadata document.
pub const METADATA_NAMESPACE: &str = "http://soap.sforce.com/2006/04/metadata";

/// The field that names a metadata record. It is metadata about the record and never
/// part of the document body.
pub const IDENTIFIER_FIELD: &str = "fullName";

/// Keys injected by the response decoder that carry wire-typing data only.
/// `$` holds XML attributes (e.g. `xsi:type`), `type` is the API wire type.
pub const TRANSPORT_KEYS: [&str; 2] = ["$", "type"];

/// Key under which element attributes are stored when an XML element is turned into a value.
pub const ATTRIBUTES_KEY: &str = "$";

/// Key under which element text is stored when the element also carries attributes.
pub const TEXT_KEY: &str = "_";

/// File name suffix for Profiles in the source-format project layout.
pub const PROFILE_FILE_SUFFIX: &str = ".profile-meta.xml";

/// The default directory Profiles are written to.
pub const DEFAULT_PROFILE_DIR: &str = "force-app/main/default/profiles";

/// The default Metadata API version.
pub const DEFAULT_API_VERSION: &str = "60.0";
