/// An error type for the projection module.
#[derive(thiserror::Error, Debug)]
pub enum ProjectionError {
    /// Error when the point cloud has no points to project.
    #[error("The point cloud is empty")]
    EmptyPointCloud,

    /// Error to create the raster image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] nube_image::ImageError),
}
