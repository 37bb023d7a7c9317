//! Turning user supplied files into descriptor lists.
//!
//! Files are ordered by the first number found in their name, so that
//! `frame_2.png` comes before `frame_10.png`. A batch is decoded member by
//! member: members that fail are dropped and the rest still form a group.

use log::{info, warn};

use crate::{AssetDecoder, ResourceDescriptor};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];
const SPINE_EXTENSIONS: [&str; 4] = ["skel", "json", "atlas", "png"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl AssetFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn extension(&self) -> Option<String> {
        extension(&self.name)
    }

    pub fn is_image(&self) -> bool {
        self.extension()
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Skeleton and atlas files switch a directory into Spine mode.
    pub fn is_spine_marker(&self) -> bool {
        matches!(self.extension().as_deref(), Some("skel" | "atlas"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkeletonFormat {
    Binary,
    Json,
}

/// Files sharing one basename: a skeleton, its atlas and the page images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpineFileGroup {
    pub name: String,
    pub skeleton: AssetFile,
    pub atlas: AssetFile,
    pub images: Vec<AssetFile>,
}

impl SpineFileGroup {
    pub fn skeleton_format(&self) -> SkeletonFormat {
        match self.skeleton.extension().as_deref() {
            Some("json") => SkeletonFormat::Json,
            _ => SkeletonFormat::Binary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryContents {
    Images(Vec<AssetFile>),
    Spine(Vec<SpineFileGroup>),
    Empty,
}

fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// The first run of decimal digits in `name`, 0 when there is none.
/// Runs too long for a u64 saturate.
pub fn first_number(name: &str) -> u64 {
    name.split(|c: char| !c.is_ascii_digit())
        .find(|run| !run.is_empty())
        .map(|run| run.parse().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Stable ascending sort by `first_number`; equal keys keep their order.
pub fn sort_by_first_number<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by_key(|item| first_number(name(item)));
}

fn spine_basename(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((base, ext)) if SPINE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => base,
        _ => name,
    }
}

#[derive(Default)]
struct PartialGroup {
    skeleton: Option<AssetFile>,
    atlas: Option<AssetFile>,
    images: Vec<AssetFile>,
}

/// Groups Spine files by basename. Only groups with both a skeleton and
/// an atlas are kept. Images whose basename does not form a group of its
/// own (for example the second page `hero_2.png` of `hero.atlas`) are
/// offered to every group so multi-page atlases can find them.
pub fn group_spine_files(files: Vec<AssetFile>) -> Vec<SpineFileGroup> {
    let mut partial: Vec<(String, PartialGroup)> = Vec::new();

    for file in files {
        let base = spine_basename(&file.name).to_owned();
        let index = match partial.iter().position(|(name, _)| *name == base) {
            Some(index) => index,
            None => {
                partial.push((base, PartialGroup::default()));
                partial.len() - 1
            }
        };

        let group = &mut partial[index].1;
        match file.extension().as_deref() {
            Some("skel") => group.skeleton = Some(file),
            Some("json") if group.skeleton.is_none() => group.skeleton = Some(file),
            Some("atlas") => group.atlas = Some(file),
            Some("png") => group.images.push(file),
            _ => {}
        }
    }

    let mut orphans = Vec::new();
    let mut groups = Vec::new();
    for (name, group) in partial {
        match group {
            PartialGroup {
                skeleton: Some(skeleton),
                atlas: Some(atlas),
                images,
            } => groups.push(SpineFileGroup {
                name,
                skeleton,
                atlas,
                images,
            }),
            PartialGroup { images, .. } => orphans.extend(images),
        }
    }

    for group in &mut groups {
        group.images.extend(orphans.iter().cloned());
    }

    sort_by_first_number(&mut groups, |g| &g.name);
    groups
}

pub fn classify_directory(files: Vec<AssetFile>) -> DirectoryContents {
    if files.iter().any(AssetFile::is_spine_marker) {
        let groups = group_spine_files(files);
        return match groups.is_empty() {
            true => DirectoryContents::Empty,
            false => DirectoryContents::Spine(groups),
        };
    }

    let mut images: Vec<AssetFile> = files.into_iter().filter(AssetFile::is_image).collect();
    if images.is_empty() {
        return DirectoryContents::Empty;
    }

    sort_by_first_number(&mut images, |f| &f.name);
    DirectoryContents::Images(images)
}

fn join_batch(kind: &str, total: usize, decoded: Vec<ResourceDescriptor>) -> Option<Vec<ResourceDescriptor>> {
    if decoded.is_empty() {
        info!("none of the {total} {kind} could be loaded, no group created");
        return None;
    }

    info!("loaded {} of {total} {kind}", decoded.len());
    Some(decoded)
}

/// Decodes every image, in first-number order. Failed images are dropped.
pub fn load_images<D: AssetDecoder + ?Sized>(
    decoder: &mut D,
    mut files: Vec<AssetFile>,
) -> Option<Vec<ResourceDescriptor>> {
    sort_by_first_number(&mut files, |f| &f.name);

    let total = files.len();
    let decoded = files
        .iter()
        .filter_map(|file| match decoder.decode_image(file) {
            Ok(asset) => Some(ResourceDescriptor::image(&file.name, asset)),
            Err(e) => {
                warn!("unable to load image {}: {e:#}", file.name);
                None
            }
        })
        .collect();

    join_batch("images", total, decoded)
}

/// Decodes every skeleton group, in first-number order. Failed groups are dropped.
pub fn load_spine_groups<D: AssetDecoder + ?Sized>(
    decoder: &mut D,
    mut groups: Vec<SpineFileGroup>,
) -> Option<Vec<ResourceDescriptor>> {
    sort_by_first_number(&mut groups, |g| &g.name);

    let total = groups.len();
    let decoded = groups
        .iter()
        .filter_map(|group| match decoder.decode_skeleton(group) {
            Ok(asset) => Some(ResourceDescriptor::skeletal(&group.name, asset)),
            Err(e) => {
                warn!("unable to load skeleton {}: {e:#}", group.name);
                None
            }
        })
        .collect();

    join_batch("skeletons", total, decoded)
}

pub fn load_directory<D: AssetDecoder + ?Sized>(
    decoder: &mut D,
    files: Vec<AssetFile>,
) -> Option<Vec<ResourceDescriptor>> {
    match classify_directory(files) {
        DirectoryContents::Images(images) => load_images(decoder, images),
        DirectoryContents::Spine(groups) => load_spine_groups(decoder, groups),
        DirectoryContents::Empty => {
            info!("directory holds neither images nor complete skeleton groups");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use anicheck_geometry::Size;
    use anyhow::bail;

    use super::*;
    use crate::{
        AtlasHandle, ImageAsset, ResourceKind, SkeletalAsset, SkeletonHandle, TextureHandle,
    };

    fn file(name: &str) -> AssetFile {
        AssetFile::new(name, name.as_bytes())
    }

    fn names(files: &[AssetFile]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    /// Fails on every file whose contents start with "bad".
    #[derive(Default)]
    struct FakeDecoder {
        next: u32,
    }

    impl AssetDecoder for FakeDecoder {
        fn decode_image(&mut self, file: &AssetFile) -> anyhow::Result<ImageAsset> {
            if file.name.starts_with("bad") {
                bail!("corrupt");
            }
            self.next += 1;
            Ok(ImageAsset::new(TextureHandle(self.next), Size::new(1, 1)))
        }

        fn decode_skeleton(&mut self, group: &SpineFileGroup) -> anyhow::Result<SkeletalAsset> {
            if group.name.starts_with("bad") {
                bail!("corrupt");
            }
            self.next += 1;
            Ok(SkeletalAsset::new(
                SkeletonHandle(self.next),
                AtlasHandle(self.next),
                vec!["idle".into()],
            ))
        }
    }

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("frame_12_v3.png"), 12);
        assert_eq!(first_number("007.png"), 7);
        assert_eq!(first_number("cover.png"), 0);
        assert_eq!(first_number("99999999999999999999999.png"), u64::MAX);
    }

    #[test]
    fn test_sort_is_numeric_and_stable() {
        let mut files = vec![
            file("f10.png"),
            file("b.png"),
            file("f2.png"),
            file("a.png"),
            file("f1.png"),
        ];
        sort_by_first_number(&mut files, |f| &f.name);

        assert_eq!(names(&files), vec!["b.png", "a.png", "f1.png", "f2.png", "f10.png"]);
    }

    #[test]
    fn test_group_spine_files() {
        let groups = group_spine_files(vec![
            file("hero_2.png"),
            file("boss10.skel"),
            file("hero.skel"),
            file("boss10.atlas"),
            file("hero.atlas"),
            file("hero.png"),
            file("boss10.png"),
            file("lonely.skel"),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "hero");
        assert_eq!(groups[1].name, "boss10");
        assert_eq!(names(&groups[0].images), vec!["hero.png", "hero_2.png"]);
        assert_eq!(names(&groups[1].images), vec!["boss10.png", "hero_2.png"]);
        assert_eq!(groups[0].skeleton_format(), SkeletonFormat::Binary);
    }

    #[test]
    fn test_json_skeletons_are_grouped() {
        let groups = group_spine_files(vec![file("slime.json"), file("slime.atlas")]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].skeleton_format(), SkeletonFormat::Json);
    }

    #[test]
    fn test_classify_directory() {
        let images = classify_directory(vec![file("3.png"), file("notes.txt"), file("1.JPG")]);
        match images {
            DirectoryContents::Images(files) => assert_eq!(names(&files), vec!["1.JPG", "3.png"]),
            other => panic!("unexpected {other:?}"),
        }

        let spine = classify_directory(vec![file("a.skel"), file("a.atlas"), file("a.png")]);
        assert!(matches!(spine, DirectoryContents::Spine(ref g) if g.len() == 1));

        assert_eq!(classify_directory(vec![file("readme.md")]), DirectoryContents::Empty);
        assert_eq!(classify_directory(vec![file("a.skel")]), DirectoryContents::Empty);
    }

    #[test]
    fn test_failed_members_are_dropped() {
        let mut decoder = FakeDecoder::default();
        let loaded = load_images(
            &mut decoder,
            vec![file("2.png"), file("bad_1.png"), file("1.png")],
        )
        .unwrap();

        let loaded_names: Vec<&str> = loaded.iter().map(|d| d.name()).collect();
        assert_eq!(loaded_names, vec!["1.png", "2.png"]);
    }

    #[test]
    fn test_all_failed_creates_nothing() {
        let mut decoder = FakeDecoder::default();
        assert_eq!(load_images(&mut decoder, vec![file("bad.png")]), None);
        assert_eq!(load_images(&mut decoder, vec![]), None);
    }

    #[test]
    fn test_load_spine_directory() {
        let mut decoder = FakeDecoder::default();
        let loaded = load_directory(
            &mut decoder,
            vec![
                file("b2.skel"),
                file("b2.atlas"),
                file("bad1.skel"),
                file("bad1.atlas"),
            ],
        )
        .unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].kind(), ResourceKind::Skeletal);
        assert_eq!(loaded[0].name(), "b2");
    }
}
