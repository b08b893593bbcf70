//! Minimal WordprocessingML package for a single procurement record.
//!
//! Only the three parts Word needs to open a document are written:
//! `[Content_Types].xml`, `_rels/.rels` and `word/document.xml`.

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

use super::Record;
use crate::errors::PncpResult;

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

pub const HEADER_FIELD: &str = "Campo";
pub const HEADER_VALUE: &str = "Valor";

pub fn document_title(sequencial: i64, ano: i32) -> String {
    format!("Compra {}/{}", sequencial, ano)
}

/// Render `record` as a `.docx` file: a title followed by a field/value table
pub fn render(record: &Record, title: &str) -> PncpResult<Vec<u8>> {
    let document = document_xml(record, title)?;

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES_XML.as_bytes())?;
        zip.start_file("_rels/.rels", options)?;
        zip.write_all(ROOT_RELS_XML.as_bytes())?;
        zip.start_file("word/document.xml", options)?;
        zip.write_all(&document)?;

        zip.finish()?;
    }

    Ok(cursor.into_inner())
}

fn document_xml(record: &Record, title: &str) -> PncpResult<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Start(
        BytesStart::new("w:document").with_attributes([("xmlns:w", WORDML_NS)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    write_paragraph(&mut writer, title, true)?;

    writer.write_event(Event::Start(BytesStart::new("w:tbl")))?;
    writer.write_event(Event::Start(BytesStart::new("w:tblPr")))?;
    writer.write_event(Event::Empty(
        BytesStart::new("w:tblW").with_attributes([("w:w", "5000"), ("w:type", "pct")]),
    ))?;
    writer.write_event(Event::End(BytesEnd::new("w:tblPr")))?;

    write_row(&mut writer, HEADER_FIELD, HEADER_VALUE, true)?;
    for (field, value) in record {
        write_row(&mut writer, field, &value.as_text(), false)?;
    }

    writer.write_event(Event::End(BytesEnd::new("w:tbl")))?;
    // Word expects a paragraph after a trailing table
    writer.write_event(Event::Empty(BytesStart::new("w:p")))?;
    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new("w:document")))?;

    Ok(writer.into_inner().into_inner())
}

fn write_row<W: Write>(writer: &mut Writer<W>, field: &str, value: &str, bold: bool) -> PncpResult<()> {
    writer.write_event(Event::Start(BytesStart::new("w:tr")))?;
    for text in [field, value] {
        writer.write_event(Event::Start(BytesStart::new("w:tc")))?;
        write_paragraph(writer, text, bold)?;
        writer.write_event(Event::End(BytesEnd::new("w:tc")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tr")))?;
    Ok(())
}

fn write_paragraph<W: Write>(writer: &mut Writer<W>, text: &str, bold: bool) -> PncpResult<()> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;
    writer.write_event(Event::Start(BytesStart::new("w:r")))?;
    if bold {
        writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
        writer.write_event(Event::Empty(BytesStart::new("w:b")))?;
        writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;
    }
    writer.write_event(Event::Start(
        BytesStart::new("w:t").with_attributes([("xml:space", "preserve")]),
    ))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("w:t")))?;
    writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}
