use anicheck_geometry::Size;
use derive_more::{Constructor, Display};
use thiserror::Error;

pub mod atlas;
pub mod ingest;
pub mod png;
pub mod skeleton;

pub use ingest::{AssetFile, SpineFileGroup};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Constructor)]
#[display(fmt = "texture#{}", _0)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Constructor)]
#[display(fmt = "skeleton#{}", _0)]
pub struct SkeletonHandle(pub u32);

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Constructor)]
#[display(fmt = "atlas#{}", _0)]
pub struct AtlasHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Image,
    Skeletal,
}

/// A decoded image, ready to be drawn as a textured quad.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct ImageAsset {
    pub texture: TextureHandle,
    pub size: Size<u32>,
}

/// A decoded skeleton together with its atlas and the names of the
/// animations its skeleton data declares.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct SkeletalAsset {
    pub skeleton: SkeletonHandle,
    pub atlas: AtlasHandle,
    pub animations: Vec<String>,
}

/// Immutable description of one loadable asset.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceDescriptor {
    Image {
        name: String,
        texture: TextureHandle,
        size: Size<u32>,
    },
    Skeletal {
        name: String,
        skeleton: SkeletonHandle,
        atlas: AtlasHandle,
        /// Unique, in declaration order
        animations: Vec<String>,
    },
}

impl ResourceDescriptor {
    pub fn image(name: impl Into<String>, asset: ImageAsset) -> Self {
        Self::Image {
            name: name.into(),
            texture: asset.texture,
            size: asset.size,
        }
    }

    /// Duplicated animation names are dropped, keeping the first occurrence.
    pub fn skeletal(name: impl Into<String>, asset: SkeletalAsset) -> Self {
        let mut animations: Vec<String> = Vec::with_capacity(asset.animations.len());
        for animation in asset.animations {
            if !animations.contains(&animation) {
                animations.push(animation);
            }
        }

        Self::Skeletal {
            name: name.into(),
            skeleton: asset.skeleton,
            atlas: asset.atlas,
            animations,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Image { .. } => ResourceKind::Image,
            Self::Skeletal { .. } => ResourceKind::Skeletal,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Image { name, .. } | Self::Skeletal { name, .. } => name,
        }
    }

    pub fn animations(&self) -> Option<&[String]> {
        match self {
            Self::Image { .. } => None,
            Self::Skeletal { animations, .. } => Some(animations),
        }
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("atlas {atlas} references page {page} which is not among the loaded images")]
    MissingAtlasPage { atlas: String, page: String },
    #[error("skeleton {0} is in a format this decoder does not read")]
    UnsupportedSkeleton(String),
    #[error("{0} is not a supported image")]
    UnsupportedImage(String),
}

/// Turns raw files into renderer handles. Implemented by the rendering
/// backend, which owns the decoded textures and skeletons.
pub trait AssetDecoder {
    fn decode_image(&mut self, file: &AssetFile) -> anyhow::Result<ImageAsset>;

    fn decode_skeleton(&mut self, group: &SpineFileGroup) -> anyhow::Result<SkeletalAsset>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeletal_descriptor_deduplicates_animations() {
        let descriptor = ResourceDescriptor::skeletal(
            "hero",
            SkeletalAsset::new(
                SkeletonHandle(1),
                AtlasHandle(1),
                vec!["idle".into(), "run".into(), "idle".into()],
            ),
        );

        assert_eq!(descriptor.kind(), ResourceKind::Skeletal);
        assert_eq!(descriptor.name(), "hero");
        assert_eq!(
            descriptor.animations(),
            Some(&["idle".to_string(), "run".to_string()][..])
        );
    }

    #[test]
    fn test_image_descriptor_has_no_animations() {
        let descriptor =
            ResourceDescriptor::image("frame_1.png", ImageAsset::new(TextureHandle(3), Size::new(4, 4)));

        assert_eq!(descriptor.kind(), ResourceKind::Image);
        assert_eq!(descriptor.animations(), None);
    }
}
