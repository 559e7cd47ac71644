//! Protocol constants shared by negotiation and the adapter families

/// Version header sent by v1-v3 services
pub const DATA_SERVICE_VERSION_HEADER: &str = "DataServiceVersion";

/// Maximum version header for v1-v3 requests
pub const MAX_DATA_SERVICE_VERSION_HEADER: &str = "MaxDataServiceVersion";

/// Version header sent by v4 services
pub const ODATA_VERSION_HEADER: &str = "OData-Version";

/// Maximum version header for v4 requests
pub const ODATA_MAX_VERSION_HEADER: &str = "OData-MaxVersion";

/// Response headers checked for the protocol version, in priority order
pub const VERSION_HEADERS: [&str; 2] = [DATA_SERVICE_VERSION_HEADER, ODATA_VERSION_HEADER];

/// Root attribute of an EDMX document carrying the protocol version
pub const VERSION_ATTRIBUTE: &str = "Version";

/// Path segment of the service metadata document
pub const METADATA_LITERAL: &str = "$metadata";

/// Version token selecting the v4 family
pub const V4_VERSION_TOKEN: &str = "4.0";

/// Version tokens selecting the v3 family
pub const V3_VERSION_TOKENS: [&str; 3] = ["1.0", "2.0", "3.0"];
