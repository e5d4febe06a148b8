// ABOUTME: Validated domain types shared by configuration and verification.
// ABOUTME: Image references, component versions, and Kubernetes object names.

mod image_ref;
mod resource_name;
mod version;

pub use image_ref::{ImageRef, ParseImageRefError};
pub use resource_name::{MAX_LABEL_LEN, ResourceName, ResourceNameError};
pub use version::{ComponentVersion, ParseVersionError};
