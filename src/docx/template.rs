//! Built-in blank document.
//!
//! A blank document is a complete package generated here and then opened
//! through the same path as a template file.

use super::constants::{content_type as ct, namespace as ns, relationship_type as rt};
use super::package::{
    CONTENT_TYPES_PART, ContentTypes, PACKAGE_RELS_PART, Package, Relationships, rels_part_name,
};
use super::section::Section;
use super::style::default_styles_xml;
use crate::common::Result;
use crate::common::xml::escape_xml;
use chrono::{DateTime, SecondsFormat, Utc};

pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const SETTINGS_PART: &str = "word/settings.xml";
const CORE_PART: &str = "docProps/core.xml";
const APP_PART: &str = "docProps/app.xml";

/// Document core properties written to `docProps/core.xml`.
#[derive(Debug, Clone)]
pub(crate) struct CoreProperties {
    pub(crate) title: Option<String>,
    pub(crate) creator: Option<String>,
    pub(crate) created: DateTime<Utc>,
    pub(crate) modified: DateTime<Utc>,
}

impl CoreProperties {
    fn now() -> Self {
        let now = Utc::now();
        Self {
            title: None,
            creator: Some(env!("CARGO_PKG_NAME").to_string()),
            created: now,
            modified: now,
        }
    }

    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);

        if let Some(ref title) = self.title {
            xml.push_str("<dc:title>");
            xml.push_str(&escape_xml(title));
            xml.push_str("</dc:title>");
        }

        if let Some(ref creator) = self.creator {
            xml.push_str("<dc:creator>");
            xml.push_str(&escape_xml(creator));
            xml.push_str("</dc:creator>");
        }

        xml.push_str("<dcterms:created xsi:type=\"dcterms:W3CDTF\">");
        xml.push_str(&self.created.to_rfc3339_opts(SecondsFormat::Secs, true));
        xml.push_str("</dcterms:created>");

        xml.push_str("<dcterms:modified xsi:type=\"dcterms:W3CDTF\">");
        xml.push_str(&self.modified.to_rfc3339_opts(SecondsFormat::Secs, true));
        xml.push_str("</dcterms:modified>");

        xml.push_str("</cp:coreProperties>");
        xml
    }
}

/// Creates an empty document body holding a single section definition.
fn default_document_xml() -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<w:document xmlns:w="{}" xmlns:r="{}" xmlns:wp="{}" xmlns:a="{}" xmlns:pic="{}"><w:body>"#,
        ns::WML_MAIN,
        ns::OFC_RELATIONSHIPS,
        ns::DML_WORDPROCESSING_DRAWING,
        ns::DML_MAIN,
        ns::DML_PICTURE,
    ));
    Section::default().to_xml(&mut xml);
    xml.push_str("</w:body></w:document>");
    xml
}

fn default_settings_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="{}"><w:zoom w:percent="100"/><w:defaultTabStop w:val="720"/><w:characterSpacingControl w:val="doNotCompress"/><w:compat><w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/></w:compat></w:settings>"#,
        ns::WML_MAIN
    )
}

fn default_app_props_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>{}</Application><DocSecurity>0</DocSecurity><ScaleCrop>false</ScaleCrop></Properties>"#,
        concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
    )
}

/// Assemble the package of a blank document.
pub(crate) fn blank_package() -> Result<Package> {
    let mut package = Package::new();

    let mut types = ContentTypes::new();
    types.ensure_override(DOCUMENT_PART, ct::WML_DOCUMENT_MAIN);
    types.ensure_override(STYLES_PART, ct::WML_STYLES);
    types.ensure_override(SETTINGS_PART, ct::WML_SETTINGS);
    types.ensure_override(CORE_PART, ct::OPC_CORE_PROPERTIES);
    types.ensure_override(APP_PART, ct::OFC_EXTENDED_PROPERTIES);
    package.set(CONTENT_TYPES_PART, types.to_xml().into_bytes());

    let mut package_rels = Relationships::new();
    package_rels.add(rt::OFFICE_DOCUMENT, DOCUMENT_PART);
    package_rels.add(rt::CORE_PROPERTIES, CORE_PART);
    package_rels.add(rt::EXTENDED_PROPERTIES, APP_PART);
    package.set(PACKAGE_RELS_PART, package_rels.to_xml().into_bytes());

    let mut document_rels = Relationships::new();
    document_rels.add(rt::STYLES, "styles.xml");
    document_rels.add(rt::SETTINGS, "settings.xml");
    package.set(
        &rels_part_name(DOCUMENT_PART),
        document_rels.to_xml().into_bytes(),
    );

    package.set(DOCUMENT_PART, default_document_xml().into_bytes());
    package.set(STYLES_PART, default_styles_xml()?.into_bytes());
    package.set(SETTINGS_PART, default_settings_xml().into_bytes());
    package.set(CORE_PART, CoreProperties::now().to_xml().into_bytes());
    package.set(APP_PART, default_app_props_xml().into_bytes());

    Ok(package)
}
