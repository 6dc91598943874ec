pub mod erosion;
pub mod flood;
pub mod line;
pub mod trim;
pub mod voronoi;
