use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::DynamicImage;
use tracing::info;

use crate::detection::Workspace;

/// Writes intermediate pipeline images to a directory for inspection.
#[derive(Clone, Debug)]
pub struct DebugDump {
    output_dir: PathBuf,
}

impl DebugDump {
    /// The directory must be empty or non-existent
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let mut entries = std::fs::read_dir(&output_dir)
                .with_context(|| format!("reading debug directory {}", output_dir.display()))?;
            if entries.next().is_some() {
                anyhow::bail!("Debug directory is not empty: {}", output_dir.display());
            }
        } else {
            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("creating debug directory {}", output_dir.display()))?;
        }

        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn save_input(&self, img: &DynamicImage) -> Result<()> {
        let path = self.output_dir.join("00_input.png");
        img.save(&path)
            .with_context(|| format!("Failed to save debug image {}", path.display()))?;
        info!(path = %path.display(), "saved debug input");
        Ok(())
    }

    /// Save the grayscale, smoothed and edge buffers of a run.
    pub fn save_stages(&self, workspace: &Workspace) -> Result<()> {
        let stages = [
            ("01_grayscale.png", workspace.grayscale()),
            ("02_smoothed.png", workspace.smoothed()),
            ("03_edges.png", workspace.edges()),
        ];
        for (name, buffer) in stages {
            let path = self.output_dir.join(name);
            buffer
                .save(&path)
                .with_context(|| format!("Failed to save debug image {}", path.display()))?;
        }
        info!(dir = %self.output_dir.display(), "saved stage images");
        Ok(())
    }
}
