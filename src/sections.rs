use chrono::Utc;
use serde_json::{Map, Value, json};

use crate::models::SectionUpload;

/// Section merge engine for page documents.
///
/// Page `sections` are a nested JSON tree edited language-by-language from the
/// admin dashboard. An update request carries only the sections it touches, so
/// the stored tree and the incoming patch have to be merged rather than
/// replaced, and uploaded-file metadata has to be written at nested paths
/// inside the result.

/// Recursively merges `patch` over `base`.
///
/// Objects merge key-by-key; arrays and scalars replace the stored value
/// wholesale. Keys present only in `base` survive, so a request that edits the
/// hero section never drops the blog section. `null` in the patch explicitly
/// clears the stored value.
pub fn deep_merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, patch_value),
                    None => {
                        base_map.insert(key, patch_value);
                    }
                }
            }
        }
        (slot, replacement) => *slot = replacement,
    }
}

/// Writes `value` at a dotted path inside `root`, creating intermediate
/// objects as needed. Bracketed segments (`hero[backgroundImage]`, the
/// multipart field syntax the dashboard uses) are normalized to dots first.
/// Any non-object encountered along the way is replaced by an object.
pub fn set_section_path(root: &mut Value, path: &str, value: Value) {
    let normalized = path.replace('[', ".").replace(']', "");
    let segments: Vec<&str> = normalized
        .split('.')
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        return;
    }

    let mut cursor = root;
    for segment in &segments[..segments.len() - 1] {
        if !cursor.is_object() {
            *cursor = Value::Object(Map::new());
        }
        let map = match cursor.as_object_mut() {
            Some(map) => map,
            None => return,
        };
        cursor = map
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !cursor.is_object() {
        *cursor = Value::Object(Map::new());
    }
    if let Some(map) = cursor.as_object_mut() {
        if let Some(last) = segments.last() {
            map.insert((*last).to_string(), value);
        }
    }
}

/// Builds the stored representation of an uploaded asset: the public URL plus
/// the metadata the dashboard shows next to the field.
pub fn image_asset_value(upload: &SectionUpload, url: &str) -> Value {
    json!({
        "url": url,
        "alt": upload.alt.clone().unwrap_or_default(),
        "size": upload.size.unwrap_or(0),
        "mimeType": upload.mime_type.clone().unwrap_or_default(),
        "uploadedAt": Utc::now(),
    })
}

/// Default section tree for the home page. Served whenever no home document
/// exists for the requested language, and used as the merge base for the
/// first upsert.
pub fn default_home_sections() -> Value {
    json!({
        "hero": {
            "title": "Innovative Solutions for a Better Tomorrow",
            "subtitle": "Partnering with our customers to bring quality and confidence to every engagement.",
            "backgroundImage": "/images/hero-bg.jpg",
            "primaryButton": { "text": "Discover Services", "url": "/services" },
            "secondaryButton": { "text": "Learn More", "url": "/about" }
        },
        "about": {
            "title": "About Us",
            "image": "/images/about.jpg",
            "content": { "blocks": [] },
            "features": []
        },
        "services": {
            "title": "Our Services",
            "subtitle": "What We Offer",
            "featuredServices": []
        },
        "blog": {
            "title": "Our Blog",
            "subtitle": "Latest News and Updates",
            "featuredBlogs": []
        },
        "features": []
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_untouched_sections() {
        let mut base = json!({
            "hero": { "title": "Old", "subtitle": "Keep me" },
            "blog": { "title": "Blog" }
        });
        deep_merge(&mut base, json!({ "hero": { "title": "New" } }));

        assert_eq!(base["hero"]["title"], "New");
        assert_eq!(base["hero"]["subtitle"], "Keep me");
        assert_eq!(base["blog"]["title"], "Blog");
    }

    #[test]
    fn merge_replaces_arrays_wholesale() {
        let mut base = json!({ "features": [{"title": "a"}, {"title": "b"}, {"title": "c"}] });
        deep_merge(&mut base, json!({ "features": [{"title": "z"}] }));

        // A shortened list must not keep spliced leftovers from the old one.
        assert_eq!(base["features"].as_array().unwrap().len(), 1);
        assert_eq!(base["features"][0]["title"], "z");
    }

    #[test]
    fn merge_descends_into_nested_objects() {
        let mut base = json!({ "hero": { "primaryButton": { "text": "Go", "url": "/x" } } });
        deep_merge(&mut base, json!({ "hero": { "primaryButton": { "text": "Start" } } }));

        assert_eq!(base["hero"]["primaryButton"]["text"], "Start");
        assert_eq!(base["hero"]["primaryButton"]["url"], "/x");
    }

    #[test]
    fn merge_null_clears_stored_value() {
        let mut base = json!({ "hero": { "backgroundImage": "/old.jpg" } });
        deep_merge(&mut base, json!({ "hero": { "backgroundImage": null } }));
        assert!(base["hero"]["backgroundImage"].is_null());
    }

    #[test]
    fn merge_adds_new_sections() {
        let mut base = json!({ "hero": {} });
        deep_merge(&mut base, json!({ "cta": { "title": "Ready?" } }));
        assert_eq!(base["cta"]["title"], "Ready?");
    }

    #[test]
    fn set_path_creates_intermediate_objects() {
        let mut root = json!({});
        set_section_path(&mut root, "hero.backgroundImage", json!("u"));
        assert_eq!(root["hero"]["backgroundImage"], "u");
    }

    #[test]
    fn set_path_accepts_bracket_syntax() {
        let mut root = json!({ "about": { "title": "t" } });
        set_section_path(&mut root, "about[image]", json!({ "url": "/a.jpg" }));
        assert_eq!(root["about"]["image"]["url"], "/a.jpg");
        assert_eq!(root["about"]["title"], "t");
    }

    #[test]
    fn set_path_overwrites_scalar_intermediates() {
        let mut root = json!({ "hero": "not-an-object" });
        set_section_path(&mut root, "hero.title", json!("T"));
        assert_eq!(root["hero"]["title"], "T");
    }

    #[test]
    fn asset_value_carries_metadata() {
        let upload = SectionUpload {
            path: "hero.backgroundImage".to_string(),
            key: "uploads/images/abc.jpg".to_string(),
            alt: Some("Hero".to_string()),
            size: Some(1234),
            mime_type: Some("image/jpeg".to_string()),
        };
        let value = image_asset_value(&upload, "http://cdn/uploads/images/abc.jpg");

        assert_eq!(value["url"], "http://cdn/uploads/images/abc.jpg");
        assert_eq!(value["alt"], "Hero");
        assert_eq!(value["size"], 1234);
        assert_eq!(value["mimeType"], "image/jpeg");
        assert!(value["uploadedAt"].is_string());
    }

    #[test]
    fn default_home_has_every_core_section() {
        let sections = default_home_sections();
        for key in ["hero", "about", "services", "blog", "features"] {
            assert!(sections.get(key).is_some(), "missing section {key}");
        }
    }
}
