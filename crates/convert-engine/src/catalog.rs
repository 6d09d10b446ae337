//! Built-in converter catalog.

use convert_core::types::ConverterDescriptor;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Reads a CSV from `argv[1]` and writes an XLSX to `argv[2]`.
const CSV_TO_XLSX_SCRIPT: &str =
    "import sys, pandas as pd; pd.read_csv(sys.argv[1]).to_excel(sys.argv[2], index=False)";

/// The converters shipped with the server.
pub fn builtin_converters() -> Vec<ConverterDescriptor> {
    vec![
        // Documents
        ConverterDescriptor::new(
            "pdf2docx",
            "PDF → DOCX",
            "soffice",
            &["--headless", "--convert-to", "docx", "{input}", "--outdir", "{outdir}"],
            "docx",
        )
        .accepts(&["application/pdf"])
        .requires(&["libreoffice"]),
        ConverterDescriptor::new(
            "docx2pdf",
            "DOCX → PDF",
            "soffice",
            &["--headless", "--convert-to", "pdf", "{input}", "--outdir", "{outdir}"],
            "pdf",
        )
        .accepts(&[DOCX_MIME])
        .requires(&["libreoffice"]),
        ConverterDescriptor::new(
            "pptx2pdf",
            "PPTX → PDF",
            "soffice",
            &["--headless", "--convert-to", "pdf", "{input}", "--outdir", "{outdir}"],
            "pdf",
        )
        .accepts(&[PPTX_MIME])
        .requires(&["libreoffice"]),
        ConverterDescriptor::new(
            "pdf2txt",
            "PDF → TXT",
            "pdftotext",
            &["{input}", "{output}"],
            "txt",
        )
        .accepts(&["application/pdf"])
        .requires(&["poppler-utils"]),
        ConverterDescriptor::new(
            "csv2xlsx",
            "CSV → XLSX",
            "python3",
            &["-c", CSV_TO_XLSX_SCRIPT, "{input}", "{output}"],
            "xlsx",
        )
        .accepts(&["text/csv"])
        .requires(&["python", "pandas"]),
        // Images
        ConverterDescriptor::new(
            "png2jpeg",
            "PNG → JPEG",
            "convert",
            &["{input}", "-quality", "85", "{output}"],
            "jpg",
        )
        .accepts(&["image/png"])
        .requires(&["imagemagick"]),
        ConverterDescriptor::new(
            "jpeg2png",
            "JPEG → PNG",
            "convert",
            &["{input}", "{output}"],
            "png",
        )
        .accepts(&["image/jpeg"])
        .requires(&["imagemagick"]),
        ConverterDescriptor::new(
            "pdf2jpg",
            "PDF → JPG",
            "convert",
            &["-density", "150", "{input}[0]", "-quality", "90", "{output}"],
            "jpg",
        )
        .accepts(&["application/pdf"])
        .requires(&["imagemagick", "ghostscript"]),
        ConverterDescriptor::new(
            "png2webp",
            "PNG → WEBP",
            "cwebp",
            &["-q", "80", "{input}", "-o", "{output}"],
            "webp",
        )
        .accepts(&["image/png"])
        .requires(&["libwebp"]),
        ConverterDescriptor::new(
            "jpeg2webp",
            "JPEG → WEBP",
            "cwebp",
            &["-q", "80", "{input}", "-o", "{output}"],
            "webp",
        )
        .accepts(&["image/jpeg"])
        .requires(&["libwebp"]),
        // tesseract appends ".txt" to the base it is given
        ConverterDescriptor::new(
            "jpeg2txt",
            "JPEG → TXT (OCR)",
            "tesseract",
            &["{input}", "{output_base}", "-l", "eng"],
            "txt",
        )
        .accepts(&["image/jpeg", "image/png"])
        .requires(&["tesseract"]),
        // Audio / video
        ConverterDescriptor::new(
            "wav2mp3",
            "WAV → MP3",
            "ffmpeg",
            &["-y", "-i", "{input}", "-codec:a", "libmp3lame", "-q:a", "2", "{output}"],
            "mp3",
        )
        .accepts(&["audio/wav", "audio/x-wav"])
        .requires(&["ffmpeg"]),
        ConverterDescriptor::new(
            "mp4clip2gif",
            "MP4 (10s) → GIF",
            "ffmpeg",
            &["-y", "-ss", "0", "-t", "10", "-i", "{input}", "-vf", "scale=480:-1", "{output}"],
            "gif",
        )
        .accepts(&["video/mp4"])
        .requires(&["ffmpeg"]),
        ConverterDescriptor::new(
            "gif2mp4",
            "GIF → MP4",
            "ffmpeg",
            &[
                "-y",
                "-i",
                "{input}",
                "-movflags",
                "faststart",
                "-pix_fmt",
                "yuv420p",
                "{output}",
            ],
            "mp4",
        )
        .accepts(&["image/gif"])
        .requires(&["ffmpeg"]),
    ]
}
