#![allow(clippy::module_name_repetitions)]
//! Docker image helpers.

use std::path::Path;

use crate::errors::Result;
use crate::runner::CommandRunner;

pub fn image_inspect_args(image: &str) -> Vec<String> {
    vec![
        "docker".to_string(),
        "image".to_string(),
        "inspect".to_string(),
        image.to_string(),
    ]
}

pub fn build_image_args(tag: &str, context: &Path) -> Vec<String> {
    vec![
        "docker".to_string(),
        "build".to_string(),
        "-t".to_string(),
        tag.to_string(),
        context.display().to_string(),
    ]
}

/// Return true if a docker image exists locally (without pulling).
pub fn image_exists(runner: &dyn CommandRunner, image: &str) -> Result<bool> {
    let out = runner.output(&image_inspect_args(image), None)?;
    Ok(out.success())
}
