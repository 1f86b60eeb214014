//! services/api/src/pdf.rs
//!
//! Assembles the promo document for a product: brand heading, optional AI
//! illustration, fixed-order product sections and a footer, paginated with a
//! top-down cursor. Any layout failure is re-signaled as the single generic
//! `PdfError::GenerationFailed`; no partial artifact escapes.

use printpdf::{
    BuiltinFont, Image as PdfImage, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference,
};
use tracing::error;

use ancient_eats_core::domain::Product;
use ancient_eats_core::ports::{ImageGenerator, ImageQuality, ImageRequest, ImageSize};
use ancient_eats_core::prompt::generate_promo_prompt;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
/// Sections start a new page once the cursor passes this distance from the bottom.
const BOTTOM_GUARD: f32 = 50.0;
const FOOTER_OFFSET: f32 = 30.0;
const LINE_HEIGHT: f32 = 6.0;
const IMAGE_SIDE: f32 = 120.0;
/// Points to millimetres.
const PT_TO_MM: f32 = 0.352_778;

const FOOTER_TEXT: &str = "Generated by Ancient Eats - Rediscover the flavors of the past";

/// Rendering options for one promo document.
#[derive(Debug, Clone, Copy)]
pub struct PdfOptions {
    pub include_full_content: bool,
    pub include_ai_image: bool,
    pub image_size: ImageSize,
    pub image_quality: ImageQuality,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            include_full_content: false,
            include_ai_image: true,
            image_size: ImageSize::default(),
            image_quality: ImageQuality::default(),
        }
    }
}

/// A finished promo document ready to be saved client-side.
#[derive(Debug, Clone)]
pub struct PromoPdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("Failed to generate PDF. Please try again.")]
    GenerationFailed,
}

/// Generates the promo document for a product. Illustration failures are
/// logged and skipped; the document is still produced without the image.
pub async fn generate_promo_pdf(
    product: &Product,
    options: PdfOptions,
    images: &dyn ImageGenerator,
) -> Result<PromoPdf, PdfError> {
    let illustration = if options.include_ai_image {
        let prompt = generate_promo_prompt(&product.name, &product.description, product.category);
        let request = ImageRequest::new(prompt)
            .with_size(options.image_size)
            .with_quality(options.image_quality);
        match images.generate_promo_image(request).await {
            Ok(image) => Some(image.png),
            Err(e) => {
                error!(error = %e, "could not add promo illustration, continuing without it");
                None
            }
        }
    } else {
        None
    };

    let bytes = build_document(product, &options, illustration).map_err(|e| {
        error!(error = %e, product = %product.id, "promo document layout failed");
        PdfError::GenerationFailed
    })?;

    Ok(PromoPdf {
        file_name: promo_file_name(&product.name),
        bytes,
    })
}

/// File name: product name with non-alphanumeric characters replaced by `_`,
/// suffixed `_promo.pdf`.
pub fn promo_file_name(product_name: &str) -> String {
    let stem: String = product_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}_promo.pdf")
}

//=========================================================================================
// Section Planning (pure)
//=========================================================================================

#[derive(Debug, PartialEq)]
enum SectionBody<'a> {
    Paragraph(&'a str),
    Bullets(&'a [String]),
}

#[derive(Debug, PartialEq)]
struct Section<'a> {
    title: &'static str,
    body: SectionBody<'a>,
}

/// The optional sections that follow the always-present description, in their
/// fixed emission order.
fn optional_sections<'a>(product: &'a Product, options: &PdfOptions) -> Vec<Section<'a>> {
    let mut sections = Vec::new();

    if options.include_full_content {
        if let Some(text) = product.detailed_description.as_deref() {
            sections.push(Section {
                title: "Detailed Description:",
                body: SectionBody::Paragraph(text),
            });
        }
    }
    if let Some(text) = product.historical_context.as_deref() {
        sections.push(Section {
            title: "Historical Context:",
            body: SectionBody::Paragraph(text),
        });
    }
    if let Some(items) = product.ingredients.as_deref() {
        if !items.is_empty() {
            sections.push(Section {
                title: "Key Ingredients:",
                body: SectionBody::Bullets(items),
            });
        }
    }
    if let Some(items) = product.techniques.as_deref() {
        if !items.is_empty() {
            sections.push(Section {
                title: "Techniques Covered:",
                body: SectionBody::Bullets(items),
            });
        }
    }
    if options.include_full_content {
        if let Some(text) = product.sample_content.as_deref() {
            sections.push(Section {
                title: "Sample Content:",
                body: SectionBody::Paragraph(text),
            });
        }
    }

    sections
}

//=========================================================================================
// Layout Engine
//=========================================================================================

#[derive(Debug, thiserror::Error)]
enum BuildError {
    #[error(transparent)]
    Pdf(#[from] printpdf::Error),
    #[error("embedded image decode failed: {0}")]
    Image(String),
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

/// Top-down layout cursor over an A4 document.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    /// Millimetres from the top of the current page.
    y: f32,
}

impl<'a> PageCursor<'a> {
    fn new(doc: &'a PdfDocumentReference, layer: PdfLayerReference) -> Self {
        Self {
            doc,
            layer,
            y: MARGIN,
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = MARGIN;
    }

    fn break_page_if_near_bottom(&mut self) {
        if self.y > PAGE_HEIGHT - BOTTOM_GUARD {
            self.new_page();
        }
    }

    /// Writes one line at the current cursor without advancing it.
    fn line_at(&self, text: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.layer
            .use_text(text, size, Mm(x), Mm(PAGE_HEIGHT - self.y), font);
    }

    fn centered_line(&self, text: &str, size: f32, font: &IndirectFontRef) {
        let x = (PAGE_WIDTH - text_width_mm(text, size)) / 2.0;
        self.line_at(text, size, x, font);
    }

    /// Word-wraps a paragraph at the content width and advances past it.
    fn paragraph(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        let lines = wrap_text(text, size, PAGE_WIDTH - 2.0 * MARGIN);
        for line in &lines {
            self.line_at(line, size, MARGIN, font);
            self.y += LINE_HEIGHT;
        }
        self.y += 10.0;
    }

    fn bullets(&mut self, items: &[String], size: f32, font: &IndirectFontRef) {
        for item in items {
            self.line_at(&format!("• {item}"), size, MARGIN + 5.0, font);
            self.y += LINE_HEIGHT;
        }
        self.y += 10.0;
    }
}

/// Approximate rendered width for the built-in Helvetica faces.
fn text_width_mm(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5 * PT_TO_MM
}

/// Greedy word wrap against an estimated line width.
fn wrap_text(text: &str, size: f32, max_width_mm: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width_mm(&candidate, size) > max_width_mm && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn build_document(
    product: &Product,
    options: &PdfOptions,
    illustration: Option<Vec<u8>>,
) -> Result<Vec<u8>, BuildError> {
    let (doc, page, layer) = PdfDocument::new(
        "Ancient Eats Promo",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
        italic: doc.add_builtin_font(BuiltinFont::HelveticaOblique)?,
    };
    let layer = doc.get_page(page).get_layer(layer);
    let mut cursor = PageCursor::new(&doc, layer);

    // Title block.
    cursor.centered_line("Ancient Eats", 24.0, &fonts.bold);
    cursor.y += 15.0;
    cursor.centered_line(&product.name, 18.0, &fonts.bold);
    cursor.y += 20.0;

    if let Some(png) = illustration {
        embed_illustration(&mut cursor, &png)?;
    }

    // Product information.
    cursor.line_at("Product Information", 14.0, MARGIN, &fonts.bold);
    cursor.y += 10.0;
    cursor.line_at(
        &format!("Category: {}", product.category.label()),
        12.0,
        MARGIN,
        &fonts.regular,
    );
    cursor.y += 8.0;
    cursor.line_at(&format!("Price: {}", product.price), 12.0, MARGIN, &fonts.regular);
    cursor.y += 15.0;

    cursor.line_at("Description:", 12.0, MARGIN, &fonts.bold);
    cursor.y += 8.0;
    cursor.paragraph(&product.description, 12.0, &fonts.regular);

    for section in optional_sections(product, options) {
        cursor.break_page_if_near_bottom();
        cursor.line_at(section.title, 12.0, MARGIN, &fonts.bold);
        cursor.y += 8.0;
        match section.body {
            SectionBody::Paragraph(text) => cursor.paragraph(text, 12.0, &fonts.regular),
            SectionBody::Bullets(items) => cursor.bullets(items, 12.0, &fonts.regular),
        }
    }

    // Footer pinned near the bottom of the last page.
    if cursor.y > PAGE_HEIGHT - FOOTER_OFFSET {
        cursor.new_page();
    }
    cursor.y = PAGE_HEIGHT - FOOTER_OFFSET;
    cursor.centered_line(FOOTER_TEXT, 10.0, &fonts.italic);

    Ok(doc.save_to_bytes()?)
}

/// Decodes the PNG and centers it as a fixed-size square at the cursor.
fn embed_illustration(cursor: &mut PageCursor<'_>, png: &[u8]) -> Result<(), BuildError> {
    let decoded = printpdf::image_crate::load_from_memory(png)
        .map_err(|e| BuildError::Image(e.to_string()))?;
    let dpi = 300.0;
    let px_to_mm = 25.4 / dpi;
    let scale_x = IMAGE_SIDE / (decoded.width() as f32 * px_to_mm);
    let scale_y = IMAGE_SIDE / (decoded.height() as f32 * px_to_mm);

    let image = PdfImage::from_dynamic_image(&decoded);
    image.add_to_layer(
        cursor.layer.clone(),
        ImageTransform {
            translate_x: Some(Mm((PAGE_WIDTH - IMAGE_SIDE) / 2.0)),
            translate_y: Some(Mm(PAGE_HEIGHT - cursor.y - IMAGE_SIDE)),
            scale_x: Some(scale_x),
            scale_y: Some(scale_y),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    cursor.y += IMAGE_SIDE + 15.0;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ancient_eats_core::catalog::Catalog;
    use ancient_eats_core::domain::ProductCategory;
    use ancient_eats_core::ports::{ImageError, ImageGenerator, ImageOrigin, PromoImage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn bare_product() -> Product {
        Product {
            id: "9".into(),
            name: "Hearth & Stone".into(),
            description: "A plain offering with no extras.".into(),
            price: "$5.99".into(),
            category: ProductCategory::Ebook,
            icon: "🔥".into(),
            detailed_description: None,
            sample_content: None,
            historical_context: None,
            ingredients: None,
            techniques: None,
        }
    }

    struct NoImage;

    #[async_trait]
    impl ImageGenerator for NoImage {
        async fn generate_promo_image(
            &self,
            _request: ancient_eats_core::ports::ImageRequest,
        ) -> Result<PromoImage, ImageError> {
            Ok(PromoImage {
                png: crate::adapters::placeholder::render_placeholder("test").unwrap(),
                origin: ImageOrigin::Placeholder,
            })
        }
    }

    /// Records the request it was handed so tests can assert on it.
    #[derive(Default)]
    struct CapturingImages {
        seen: Mutex<Option<ImageRequest>>,
    }

    #[async_trait]
    impl ImageGenerator for CapturingImages {
        async fn generate_promo_image(
            &self,
            request: ImageRequest,
        ) -> Result<PromoImage, ImageError> {
            let png = crate::adapters::placeholder::render_placeholder(&request.prompt)?;
            *self.seen.lock().unwrap() = Some(request);
            Ok(PromoImage {
                png,
                origin: ImageOrigin::Placeholder,
            })
        }
    }

    #[tokio::test]
    async fn configured_size_and_quality_reach_the_image_request() {
        let images = CapturingImages::default();
        let options = PdfOptions {
            image_size: ImageSize::S512,
            image_quality: ImageQuality::Hd,
            ..Default::default()
        };

        generate_promo_pdf(&bare_product(), options, &images)
            .await
            .unwrap();

        let seen = images.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.size, ImageSize::S512);
        assert_eq!(seen.quality, ImageQuality::Hd);
    }

    #[test]
    fn bare_product_without_full_content_emits_no_optional_sections() {
        let product = bare_product();
        let options = PdfOptions {
            include_full_content: false,
            include_ai_image: false,
            ..Default::default()
        };
        assert!(optional_sections(&product, &options).is_empty());
    }

    #[test]
    fn full_content_sections_appear_in_fixed_order() {
        let catalog = Catalog::new();
        let bread = catalog.get("2").unwrap();
        let options = PdfOptions {
            include_full_content: true,
            include_ai_image: false,
            ..Default::default()
        };
        let titles: Vec<&str> = optional_sections(bread, &options)
            .iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Detailed Description:",
                "Historical Context:",
                "Key Ingredients:",
                "Techniques Covered:",
                "Sample Content:",
            ]
        );
    }

    #[test]
    fn sample_content_is_gated_on_full_content() {
        let catalog = Catalog::new();
        let bread = catalog.get("2").unwrap();
        let options = PdfOptions {
            include_full_content: false,
            include_ai_image: false,
            ..Default::default()
        };
        let titles: Vec<&str> = optional_sections(bread, &options)
            .iter()
            .map(|s| s.title)
            .collect();
        assert!(!titles.contains(&"Detailed Description:"));
        assert!(!titles.contains(&"Sample Content:"));
        assert!(titles.contains(&"Key Ingredients:"));
    }

    #[test]
    fn file_name_strips_non_alphanumerics() {
        assert_eq!(promo_file_name("Egyptian Bread Making"), "Egyptian_Bread_Making_promo.pdf");
        assert_eq!(promo_file_name("Spice & Salt!"), "Spice___Salt__promo.pdf");
    }

    #[test]
    fn wrap_keeps_lines_within_the_content_width() {
        let text = "Explore the humble yet nourishing cuisine of medieval monasteries where food was prepared with prayer";
        let lines = wrap_text(text, 12.0, PAGE_WIDTH - 2.0 * MARGIN);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, 12.0) <= PAGE_WIDTH - 2.0 * MARGIN);
        }
    }

    #[tokio::test]
    async fn generates_a_pdf_for_a_bare_product() {
        let pdf = generate_promo_pdf(&bare_product(), PdfOptions::default(), &NoImage)
            .await
            .unwrap();
        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert_eq!(pdf.file_name, "Hearth___Stone_promo.pdf");
    }

    #[tokio::test]
    async fn generates_a_pdf_with_every_section_and_image() {
        let catalog = Catalog::new();
        let bread = catalog.get("2").unwrap();
        let options = PdfOptions {
            include_full_content: true,
            include_ai_image: true,
            ..Default::default()
        };
        let pdf = generate_promo_pdf(bread, options, &NoImage).await.unwrap();
        assert!(pdf.bytes.starts_with(b"%PDF"));
    }
}
