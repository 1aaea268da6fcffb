use crate::config::StatusBarConfig;
use crate::error::AnnotateError;
use crate::font::StatusFont;
use image::{imageops, DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

const BAR_BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// The three strings shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText {
    pub time: String,
    pub date: String,
    pub package: String,
}

/// Stamps a status bar on top of screenshots.
#[derive(Debug)]
pub struct Annotator {
    layout: StatusBarConfig,
    font: StatusFont,
}

impl Annotator {
    pub fn new(layout: StatusBarConfig) -> Self {
        let font = StatusFont::load(&layout.font, layout.font_size);
        Self { layout, font }
    }

    pub fn with_font(layout: StatusBarConfig, font: StatusFont) -> Self {
        Self { layout, font }
    }

    /// Build the composite: a black bar of `bar_height` rows with the source pasted below
    /// it, and the time (left), package (near centre) and date (right) drawn into the bar.
    pub fn compose(&self, source: &DynamicImage, text: &StatusText) -> RgbImage {
        let layout = &self.layout;
        let width = source.width();
        let height = source.height() + layout.bar_height;

        let mut canvas = RgbImage::from_pixel(width, height, BAR_BACKGROUND);
        imageops::replace(&mut canvas, &source.to_rgb8(), 0, layout.bar_height as i64);

        let top = layout.text_padding;
        let right = width as i32 - layout.date_text_right_offset;
        let centre = (width / 2) as i32 - layout.package_name_offset;

        self.font
            .draw_text(&mut canvas, layout.text_padding, top, &text.time, TEXT_COLOR);
        self.font
            .draw_text(&mut canvas, right, top, &text.date, TEXT_COLOR);
        self.font
            .draw_text(&mut canvas, centre, top, &text.package, TEXT_COLOR);

        canvas
    }

    /// Read `source`, write the stamped copy to `destination`. The source is left alone.
    ///
    /// The image is encoded into a temporary file next to `destination` and renamed into
    /// place, so a failure never leaves a partial file at `destination`.
    pub fn annotate(
        &self,
        source: &Path,
        destination: &Path,
        text: &StatusText,
    ) -> Result<(), AnnotateError> {
        let image = image::open(source).map_err(|source_err| AnnotateError::Open {
            path: source.to_path_buf(),
            source: source_err,
        })?;

        let composite = self.compose(&image, text);
        let format = ImageFormat::from_path(destination).unwrap_or(ImageFormat::Jpeg);

        let persist_err = |err: std::io::Error| AnnotateError::Persist {
            path: destination.to_path_buf(),
            source: err,
        };

        let dir = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let temp = NamedTempFile::new_in(dir).map_err(persist_err)?;

        let mut writer = BufWriter::new(temp);
        composite
            .write_to(&mut writer, format)
            .map_err(|err| AnnotateError::Encode {
                path: destination.to_path_buf(),
                source: err,
            })?;
        writer.flush().map_err(persist_err)?;
        let temp = writer
            .into_inner()
            .map_err(|err| persist_err(err.into_error()))?;

        // Temp files are created owner-only; the stamped copy keeps the source's mode.
        fs::metadata(source)
            .and_then(|metadata| temp.as_file().set_permissions(metadata.permissions()))
            .map_err(persist_err)?;

        temp.persist(destination)
            .map_err(|err| persist_err(err.error))?;

        debug!(
            "Annotated {} -> {}",
            source.display(),
            destination.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn text() -> StatusText {
        StatusText {
            time: "09:30".to_string(),
            date: "2023-05-14".to_string(),
            package: "com.example.app".to_string(),
        }
    }

    fn annotator() -> Annotator {
        Annotator::with_font(StatusBarConfig::default(), StatusFont::builtin(16.0))
    }

    fn grey_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([128, 128, 128])))
    }

    #[test]
    fn test_compose_adds_bar_above_source() {
        let composite = annotator().compose(&grey_image(320, 240), &text());
        assert_eq!(composite.dimensions(), (320, 290));

        // Source starts right below the bar.
        assert_eq!(composite.get_pixel(0, 50).0, [128, 128, 128]);
        assert_eq!(composite.get_pixel(319, 289).0, [128, 128, 128]);
        // Bar corners stay black.
        assert_eq!(composite.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(composite.get_pixel(319, 49).0, [0, 0, 0]);
    }

    #[test]
    fn test_compose_draws_white_text_in_bar() {
        let composite = annotator().compose(&grey_image(320, 240), &text());
        let white_in_bar = composite
            .enumerate_pixels()
            .filter(|(_, y, p)| *y < 50 && p.0 == [255, 255, 255])
            .count();
        assert!(white_in_bar > 0);

        let white_below_bar = composite
            .enumerate_pixels()
            .filter(|(_, y, p)| *y >= 50 && p.0 == [255, 255, 255])
            .count();
        assert_eq!(white_below_bar, 0);

        // Time sits at the left padding, date starts 100px from the right edge.
        let lit_between = |x0: u32, x1: u32| {
            (x0..x1).any(|x| (0..50).any(|y| composite.get_pixel(x, y).0 == [255, 255, 255]))
        };
        assert!(lit_between(10, 20));
        assert!(lit_between(220, 240));
        assert!(!lit_between(0, 10));
    }

    #[test]
    fn test_compose_narrow_image_clips_text() {
        let composite = annotator().compose(&grey_image(40, 10), &text());
        assert_eq!(composite.dimensions(), (40, 60));
    }

    #[test]
    fn test_annotate_writes_destination_and_keeps_source() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source.jpg");
        grey_image(120, 80).save(&source).unwrap();
        let destination = tmp.path().join("out").join("source.jpg");
        std::fs::create_dir_all(destination.parent().unwrap()).unwrap();

        annotator().annotate(&source, &destination, &text()).unwrap();

        assert!(source.exists());
        let written = image::open(&destination).unwrap();
        assert_eq!(written.dimensions(), (120, 130));
    }

    #[cfg(unix)]
    #[test]
    fn test_annotate_keeps_source_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source.jpg");
        grey_image(8, 8).save(&source).unwrap();
        std::fs::set_permissions(&source, std::fs::Permissions::from_mode(0o644)).unwrap();
        let destination = tmp.path().join("stamped.jpg");

        annotator().annotate(&source, &destination, &text()).unwrap();

        let mode = |path: &Path| std::fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&destination), 0o644);
        assert_eq!(mode(&destination), mode(&source));
    }

    #[test]
    fn test_annotate_undecodable_source_leaves_no_output() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("broken.jpg");
        std::fs::write(&source, b"definitely not a jpeg").unwrap();
        let out_dir = tmp.path().join("out");
        std::fs::create_dir_all(&out_dir).unwrap();
        let destination = out_dir.join("broken.jpg");

        let err = annotator()
            .annotate(&source, &destination, &text())
            .unwrap_err();
        assert!(matches!(err, AnnotateError::Open { .. }));
        assert_eq!(err.stage(), "open");
        assert!(!destination.exists());
        assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_annotate_missing_destination_folder_is_persist_error() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source.jpg");
        grey_image(20, 20).save(&source).unwrap();
        let destination = tmp.path().join("missing").join("source.jpg");

        let err = annotator()
            .annotate(&source, &destination, &text())
            .unwrap_err();
        assert!(matches!(err, AnnotateError::Persist { .. }));
        assert!(!destination.exists());
    }
}
