use anyhow::Result;

use crate::{ingest::AssetFile, AssetError};

/// The parts of a Spine texture atlas the inspector needs: the page
/// images it draws from and the regions it declares.
///
/// A page starts after a blank line (or at the top of the file) with
/// the image file name, followed by `key: value` properties. Regions
/// are the following unindented lines without a colon, their own
/// properties being indented.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpineAtlas {
    pub pages: Vec<AtlasPage>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AtlasPage {
    pub name: String,
    pub regions: Vec<String>,
}

impl SpineAtlas {
    pub fn parse(text: &str) -> SpineAtlas {
        let mut atlas = SpineAtlas::default();
        let mut expect_page = true;

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                expect_page = true;
                continue;
            }

            if expect_page {
                atlas.pages.push(AtlasPage {
                    name: trimmed.to_owned(),
                    regions: Vec::new(),
                });
                expect_page = false;
                continue;
            }

            let indented = line.starts_with(char::is_whitespace);
            if indented || trimmed.contains(':') {
                continue;
            }

            if let Some(page) = atlas.pages.last_mut() {
                page.regions.push(trimmed.to_owned());
            }
        }

        atlas
    }

    /// Pairs every page with the image file it is named after.
    pub fn resolve_pages<'a>(
        &self,
        atlas_name: &str,
        images: &'a [AssetFile],
    ) -> Result<Vec<(&AtlasPage, &'a AssetFile)>> {
        self.pages
            .iter()
            .map(|page| {
                images
                    .iter()
                    .find(|image| image.name == page.name)
                    .map(|image| (page, image))
                    .ok_or_else(|| {
                        anyhow::Error::from(AssetError::MissingAtlasPage {
                            atlas: atlas_name.to_owned(),
                            page: page.name.clone(),
                        })
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATLAS: &str = "
hero.png
size: 1024, 512
format: RGBA8888
filter: Linear, Linear
repeat: none
head
  rotate: false
  xy: 2, 2
  size: 120, 96
torso
  rotate: false
  xy: 124, 2

hero_2.png
size: 256, 256
arm
  xy: 0, 0
";

    #[test]
    fn test_parse_pages_and_regions() {
        let atlas = SpineAtlas::parse(ATLAS);
        assert_eq!(atlas.pages.len(), 2);
        assert_eq!(atlas.pages[0].name, "hero.png");
        assert_eq!(atlas.pages[0].regions, vec!["head", "torso"]);
        assert_eq!(atlas.pages[1].name, "hero_2.png");
        assert_eq!(atlas.pages[1].regions, vec!["arm"]);
    }

    #[test]
    fn test_resolve_pages_requires_every_image() {
        let atlas = SpineAtlas::parse(ATLAS);
        let images = vec![AssetFile::new("hero.png", vec![])];

        let error = atlas.resolve_pages("hero.atlas", &images).unwrap_err();
        assert!(error.to_string().contains("hero_2.png"));

        let images = vec![
            AssetFile::new("hero_2.png", vec![]),
            AssetFile::new("hero.png", vec![]),
        ];
        let pages = atlas.resolve_pages("hero.atlas", &images).unwrap();
        assert_eq!(pages[0].1.name, "hero.png");
        assert_eq!(pages[1].1.name, "hero_2.png");
    }
}
