//! # Image Category Module
//!
//! Classifica ogni immagine in una categoria (gallery, dumpster, hero, logo,
//! default) a partire dalla convenzione di naming delle directory.
//!
//! ## Regola di classificazione
//! Il path relativo alla root di input viene spezzato in componenti
//! (directory + nome file senza estensione). Si parte dal componente più
//! vicino al file e si risale: il primo componente che contiene una keyword
//! decide la categoria. Se lo stesso componente contiene più keyword vince
//! la categoria con la larghezza massima più piccola.
//!
//! La classificazione non dipende dall'ordine in cui sono elencate le
//! categorie.
//!
//! ```text
//! gallery/photo1.png          -> Gallery
//! hero/logo-overlay.png       -> Logo   (il nome file è più vicino)
//! hero-logo/banner.png        -> Logo   (stesso componente, cap minore)
//! misc/team.jpg               -> Default
//! ```

use crate::config::WidthCaps;
use std::fmt;
use std::path::{Component, Path};

/// Naming-convention category of an image, controlling its maximum width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Gallery,
    Dumpster,
    Hero,
    Logo,
    Default,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Gallery,
        Category::Dumpster,
        Category::Hero,
        Category::Logo,
        Category::Default,
    ];

    /// Substring that marks a path component as belonging to this category
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Category::Gallery => Some("gallery"),
            Category::Dumpster => Some("dumpster"),
            Category::Hero => Some("hero"),
            Category::Logo => Some("logo"),
            Category::Default => None,
        }
    }

    /// Resolves the category of `path`, interpreted relative to `root` when possible
    pub fn classify(path: &Path, root: &Path, caps: &WidthCaps) -> Category {
        let relative = path.strip_prefix(root).unwrap_or(path);

        let mut components: Vec<String> = relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .filter_map(|c| match c {
                        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Some(stem) = relative.file_stem() {
            components.push(stem.to_string_lossy().into_owned());
        }

        components
            .iter()
            .rev()
            .find_map(|component| Self::classify_component(component, caps))
            .unwrap_or(Category::Default)
    }

    /// Category named by a single path component, if any
    fn classify_component(component: &str, caps: &WidthCaps) -> Option<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| {
                category
                    .keyword()
                    .is_some_and(|keyword| component.contains(keyword))
            })
            .min_by_key(|category| caps.for_category(*category))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Gallery => "gallery",
            Category::Dumpster => "dumpster",
            Category::Hero => "hero",
            Category::Logo => "logo",
            Category::Default => "default",
        };
        f.write_str(name)
    }
}
