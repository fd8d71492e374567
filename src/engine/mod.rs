pub(crate) mod catalog;
pub(crate) mod compositor;
pub(crate) mod config;
pub(crate) mod overlay;
pub(crate) mod ticket;
