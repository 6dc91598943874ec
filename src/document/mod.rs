pub mod atlas;
pub mod backup;
pub mod model;
