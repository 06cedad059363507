use web_sys as web;
use zone_core::{ImageCatalog, ImageRef};

/// Trail images indexed by `ImageRef`. Loading is fire-and-forget: an image
/// that is still loading or failed simply draws nothing.
pub struct ImageBank {
    images: Vec<Option<web::HtmlImageElement>>,
}

impl ImageBank {
    pub fn load(catalog: &ImageCatalog) -> Self {
        let mut images = Vec::with_capacity(catalog.len());
        for (_, path) in catalog.iter() {
            match web::HtmlImageElement::new() {
                Ok(img) => {
                    img.set_src(path);
                    images.push(Some(img));
                }
                Err(e) => {
                    log::warn!("[trail] could not create image for {}: {:?}", path, e);
                    images.push(None);
                }
            }
        }
        log::info!("[trail] requested {} trail images", images.len());
        Self { images }
    }

    /// Image ready to draw, if it finished loading.
    pub fn get(&self, image: ImageRef) -> Option<&web::HtmlImageElement> {
        self.images
            .get(image.0 as usize)
            .and_then(|i| i.as_ref())
            .filter(|img| img.complete() && img.natural_width() > 0)
    }
}
