use bytes::Bytes;

/// Image formats the extraction service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    /// Classifies a declared MIME type. Parameters and case are ignored.
    pub fn from_declared_mime(declared: &str) -> Option<Self> {
        let essence = declared.split(';').next().unwrap_or(declared).trim();
        const JPEG_ALIASES: &[&str] = &["image/jpeg", "image/jpg", "image/pjpeg"];
        if JPEG_ALIASES
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(essence))
        {
            Some(ImageKind::Jpeg)
        } else if essence.eq_ignore_ascii_case("image/png") {
            Some(ImageKind::Png)
        } else {
            None
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
        }
    }
}

/// A file handed over by the picker or a drop, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOffer {
    pub name: String,
    pub declared_mime: String,
    pub data: Bytes,
}

impl FileOffer {
    pub fn new(
        name: impl Into<String>,
        declared_mime: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_mime: declared_mime.into(),
            data: data.into(),
        }
    }
}

/// The single image held by the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    name: String,
    kind: ImageKind,
    data: Bytes,
}

impl StagedImage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// Raw image bytes. Cloning the returned handle does not copy the data.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IntakeOutcome {
    Accepted(StagedImage),
    Rejected { name: String, declared_mime: String },
    Empty,
}

/// First offer wins; the rest are discarded without inspection.
pub(crate) fn evaluate(offers: Vec<FileOffer>) -> IntakeOutcome {
    let Some(first) = offers.into_iter().next() else {
        return IntakeOutcome::Empty;
    };
    match ImageKind::from_declared_mime(&first.declared_mime) {
        Some(kind) => IntakeOutcome::Accepted(StagedImage {
            name: first.name,
            kind,
            data: first.data,
        }),
        None => IntakeOutcome::Rejected {
            name: first.name,
            declared_mime: first.declared_mime,
        },
    }
}
