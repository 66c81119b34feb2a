// Document extractor - Document collaborator output to PDF file record

use std::sync::Arc;

use tracing::debug;

use super::{FileNames, MediaInfoParser};
use crate::domain::model::{DocumentInfo, FileInfoRecord, MediaFileGeneralInfo, PdfFileInfo};
use crate::error::MediaMetaResult;
use crate::ports::DocumentPort;
use crate::source::OpenMedia;

/// Builds PDF records; general info is fixed, no container probe is run
pub struct DocumentParser {
    documents: Arc<dyn DocumentPort>,
}

impl DocumentParser {
    pub fn new(documents: Arc<dyn DocumentPort>) -> Self {
        Self { documents }
    }
}

impl MediaInfoParser for DocumentParser {
    fn family(&self) -> &'static str {
        "document"
    }

    fn parse(&self, media: &mut OpenMedia<'_>, names: &FileNames) -> MediaMetaResult<FileInfoRecord> {
        let general = MediaFileGeneralInfo {
            container: "PDF".to_string(),
            file_size: media.size()?,
            writing_application: None,
            internet_media_type: Some("application/pdf".to_string()),
        };
        let document = DocumentInfo::from_fields(&self.documents.read_document(media)?)?;
        debug!(
            filename = %names.original_filename,
            pages = document.pages,
            "Parsed document"
        );

        Ok(FileInfoRecord::Pdf(PdfFileInfo {
            file: names.file_info(),
            general,
            document,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fields, FakeDocuments};
    use crate::source::NamedHandle;
    use serde_json::json;
    use std::io::{Cursor, Seek, SeekFrom};

    #[test]
    fn test_parse_document() {
        let documents = FakeDocuments::new(fields(json!({
            "pages": 10,
            "author": "Alice",
            "title": null,
            "creation_date": "D:20200101120000+01'00'",
            "keywords": "ignored",
        })));
        let parser = DocumentParser::new(Arc::new(documents));
        let mut handle = NamedHandle::new(Cursor::new(vec![0u8; 321]), "report.pdf");
        handle.seek(SeekFrom::Start(17)).unwrap();

        let mut media = OpenMedia::new(&mut handle);
        let record = parser
            .parse(&mut media, &FileNames::new("report.pdf", Some("Q3 report.pdf")))
            .unwrap();
        assert_eq!(handle.stream_position().unwrap(), 17);

        assert_eq!(record.duration(), -10);
        assert_eq!(record.width(), None);
        let dict = record.as_dict().unwrap();
        assert_eq!(
            dict,
            json!({
                "filename": "report.pdf",
                "original_filename": "Q3 report.pdf",
                "ext": ".pdf",
                "general": {
                    "container": "PDF",
                    "file_size": 321,
                    "internet_media_type": "application/pdf",
                },
                "document": {
                    "pages": 10,
                    "author": "Alice",
                    "creation_date": "D:20200101120000+01'00'",
                },
            })
        );
    }

    #[test]
    fn test_missing_page_count_is_schema_error() {
        let parser = DocumentParser::new(Arc::new(FakeDocuments::new(fields(json!({})))));
        let mut handle = NamedHandle::new(Cursor::new(Vec::new()), "empty.pdf");
        let mut media = OpenMedia::new(&mut handle);
        assert!(parser
            .parse(&mut media, &FileNames::new("empty.pdf", None))
            .is_err());
    }
}
