pub(crate) mod decode;
#[cfg(feature = "http")]
pub(crate) mod http;
pub(crate) mod loader;
pub(crate) mod metadata;
pub(crate) mod source;
