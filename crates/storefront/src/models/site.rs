//! Site configuration.
//!
//! One structured type with one default construction. Every field (and every
//! nested section) is independently defaultable: a partial document from the
//! backend deserializes with the documented defaults filling the gaps, so the
//! views never see missing presentation data.

use serde::{Deserialize, Serialize};

/// Presentation settings for the whole site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub site_name: String,
    pub logo: Logo,
    pub colors: Palette,
    pub fonts: Fonts,
    pub hero_section: HeroSection,
    pub about_section: AboutSection,
    pub footer_links: Vec<FooterLink>,
    pub social: SocialLinks,
}

/// Site logo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Logo {
    pub url: String,
    pub alt: String,
}

/// Color palette applied as CSS custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub text: String,
    pub background: String,
}

/// Font family configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Fonts {
    pub heading: String,
    pub body: String,
}

/// Home page hero section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroSection {
    pub title: String,
    pub subtitle: String,
    pub button_text: String,
    pub button_link: String,
}

/// Home page about section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AboutSection {
    pub title: String,
    pub content: String,
}

/// A link rendered in the footer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterLink {
    pub label: String,
    pub href: String,
}

/// Social profile links rendered in the footer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialLinks {
    pub instagram: Option<String>,
    pub facebook: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "Nonna & Rue's Unique Finds".to_string(),
            logo: Logo::default(),
            colors: Palette::default(),
            fonts: Fonts::default(),
            hero_section: HeroSection::default(),
            about_section: AboutSection::default(),
            footer_links: default_footer_links(),
            social: SocialLinks::default(),
        }
    }
}

impl Default for Logo {
    fn default() -> Self {
        Self {
            url: "/static/images/nonna-and-rues-logo.svg".to_string(),
            alt: "Nonna & Rue's Unique Finds Logo".to_string(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: "#a67c52".to_string(),
            secondary: "#2a623d".to_string(),
            accent: "#e9d8c4".to_string(),
            text: "#333333".to_string(),
            background: "#f9f7f3".to_string(),
        }
    }
}

impl Default for Fonts {
    fn default() -> Self {
        Self {
            heading: "Playfair Display".to_string(),
            body: "Montserrat".to_string(),
        }
    }
}

impl Default for HeroSection {
    fn default() -> Self {
        Self {
            title: "Nonna & Rue's Unique Finds".to_string(),
            subtitle: "Curated treasures and vintage collectibles with a touch of Southern charm"
                .to_string(),
            button_text: "Browse Our Collection".to_string(),
            button_link: "/products".to_string(),
        }
    }
}

impl Default for AboutSection {
    fn default() -> Self {
        Self {
            title: "Our Story".to_string(),
            content: "At Nonna & Rue's, we bring you a carefully curated selection of unique \
                      finds, vintage treasures, and handcrafted items that reflect the warm \
                      hospitality and timeless elegance of cherished family traditions."
                .to_string(),
        }
    }
}

fn default_footer_links() -> Vec<FooterLink> {
    [
        ("Home", "/"),
        ("Products", "/products"),
        ("About", "/about"),
        ("Contact", "/contact"),
    ]
    .into_iter()
    .map(|(label, href)| FooterLink {
        label: label.to_string(),
        href: href.to_string(),
    })
    .collect()
}
