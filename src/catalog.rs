use crate::mcp::contracts;
use serde::Serialize;

/// Which file kinds a tool accepts when the caller selects inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Accept {
    Pdf,
    Images,
    Documents,
}

impl Accept {
    /// Extension filter string, in the shape of a file-picker accept list.
    pub fn filter(self) -> &'static str {
        match self {
            Accept::Pdf => ".pdf",
            Accept::Images => ".png,.jpg,.jpeg",
            Accept::Documents => ".pdf,.doc,.docx,.ppt,.pptx,.xls,.xlsx",
        }
    }
}

/// Static metadata record describing one selectable conversion tool.
///
/// `local` marks tools processed in-process by a dedicated handler; every
/// other tool routes to the placeholder document path.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub gradient: &'static str,
    pub accept: Accept,
    pub multiple: bool,
    pub local: bool,
}

pub const TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: contracts::TOOL_MERGE,
        title: "Merge",
        description: "Combine multiple PDFs into one document.",
        icon: "Combine",
        gradient: "from-blue-400 to-indigo-500",
        accept: Accept::Pdf,
        multiple: true,
        local: true,
    },
    ToolDescriptor {
        name: contracts::TOOL_SPLIT,
        title: "Split",
        description: "Divide a PDF into single-page documents.",
        icon: "Scissors",
        gradient: "from-orange-400 to-pink-500",
        accept: Accept::Pdf,
        multiple: false,
        local: true,
    },
    ToolDescriptor {
        name: "pdf.compress",
        title: "Compress",
        description: "Shrink a PDF's file size.",
        icon: "Minimize2",
        gradient: "from-green-400 to-emerald-600",
        accept: Accept::Pdf,
        multiple: false,
        local: false,
    },
    ToolDescriptor {
        name: "pdf.pdf_to_jpg",
        title: "To Image",
        description: "Render PDF pages as images.",
        icon: "Image",
        gradient: "from-purple-400 to-violet-600",
        accept: Accept::Pdf,
        multiple: false,
        local: false,
    },
    ToolDescriptor {
        name: contracts::TOOL_IMAGES_TO_PDF,
        title: "From Image",
        description: "Build a PDF from PNG or JPEG images.",
        icon: "FileImage",
        gradient: "from-cyan-400 to-blue-600",
        accept: Accept::Images,
        multiple: true,
        local: true,
    },
    ToolDescriptor {
        name: "pdf.word_to_pdf",
        title: "Word",
        description: "Convert DOCX to PDF.",
        icon: "FileText",
        gradient: "from-blue-500 to-blue-700",
        accept: Accept::Documents,
        multiple: false,
        local: false,
    },
    ToolDescriptor {
        name: "pdf.pdf_to_word",
        title: "To Word",
        description: "Convert a PDF into an editable document.",
        icon: "FileType2",
        gradient: "from-indigo-400 to-purple-500",
        accept: Accept::Pdf,
        multiple: false,
        local: false,
    },
    ToolDescriptor {
        name: "pdf.pdf_to_ppt",
        title: "To Slides",
        description: "Convert a PDF into a presentation.",
        icon: "Presentation",
        gradient: "from-orange-500 to-red-500",
        accept: Accept::Pdf,
        multiple: false,
        local: false,
    },
    ToolDescriptor {
        name: "pdf.ppt_to_pdf",
        title: "From Slides",
        description: "Convert a presentation to PDF.",
        icon: "MonitorPlay",
        gradient: "from-red-400 to-rose-600",
        accept: Accept::Documents,
        multiple: false,
        local: false,
    },
    ToolDescriptor {
        name: "pdf.excel_to_pdf",
        title: "Excel",
        description: "Convert spreadsheets to PDF.",
        icon: "Table",
        gradient: "from-emerald-500 to-teal-600",
        accept: Accept::Documents,
        multiple: false,
        local: false,
    },
    ToolDescriptor {
        name: contracts::TOOL_EXTRACT_TEXT,
        title: "Extract",
        description: "Extract plain text from a PDF.",
        icon: "AlignLeft",
        gradient: "from-gray-400 to-slate-500",
        accept: Accept::Pdf,
        multiple: false,
        local: true,
    },
    ToolDescriptor {
        name: contracts::TOOL_REMOVE_PAGES,
        title: "Remove",
        description: "Delete selected pages from a PDF.",
        icon: "Trash2",
        gradient: "from-red-500 to-red-700",
        accept: Accept::Pdf,
        multiple: false,
        local: true,
    },
    ToolDescriptor {
        name: contracts::TOOL_REORDER_PAGES,
        title: "Reorder",
        description: "Rearrange the pages of a PDF.",
        icon: "ArrowLeftRight",
        gradient: "from-yellow-400 to-orange-500",
        accept: Accept::Pdf,
        multiple: false,
        local: true,
    },
    ToolDescriptor {
        name: contracts::TOOL_WATERMARK,
        title: "Watermark",
        description: "Stamp a diagonal text watermark on every page.",
        icon: "Stamp",
        gradient: "from-teal-400 to-cyan-500",
        accept: Accept::Pdf,
        multiple: false,
        local: true,
    },
    ToolDescriptor {
        name: "pdf.protect",
        title: "Secure",
        description: "Encrypt a PDF with a password.",
        icon: "Lock",
        gradient: "from-slate-600 to-black",
        accept: Accept::Pdf,
        multiple: false,
        local: false,
    },
    ToolDescriptor {
        name: "pdf.unlock",
        title: "Unlock",
        description: "Remove a password from a PDF.",
        icon: "Unlock",
        gradient: "from-amber-400 to-orange-600",
        accept: Accept::Pdf,
        multiple: false,
        local: false,
    },
];

pub fn find(name: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|tool| tool.name == name)
}

/// Filter the catalog by a case-insensitive substring over name, title, and
/// description. An empty query returns the full catalog.
pub fn search(query: &str) -> Vec<&'static ToolDescriptor> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return TOOLS.iter().collect();
    }
    TOOLS
        .iter()
        .filter(|tool| {
            tool.name.to_lowercase().contains(&query)
                || tool.title.to_lowercase().contains(&query)
                || tool.description.to_lowercase().contains(&query)
        })
        .collect()
}
