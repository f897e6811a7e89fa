pub(crate) mod accounts;
pub(crate) mod catalog;
pub(crate) mod enrollment;
pub(crate) mod errors;
pub(crate) mod ratings;
pub(crate) mod video_embed;
