use crate::{
    data::SCHEMA_CONTAINER,
    model::{ComplexType, SchemaContainer, SimpleType},
};
use metaed_build::{
    output::{GeneratedOutput, OutputContent},
    plugin::{GenerateContext, Generator, GeneratorError},
};
use metaed_schema::{data::DataSlot, node::Namespace, version::SemVer};
use std::fmt::Write as _;
use tracing::debug;

const READS: &[DataSlot] = &[SCHEMA_CONTAINER.slot()];

/// File name of the core schema.
pub const CORE_SCHEMA_FILE: &str = "Ed-Fi-Core.xsd";

///
/// XsdGenerator
///
/// One schema file per namespace. Extensions include the core schema.
///

#[derive(Clone, Copy, Debug)]
pub struct XsdGenerator;

impl Generator for XsdGenerator {
    fn name(&self) -> &'static str {
        "XsdGenerator"
    }

    // no container is assembled before 2.0
    fn target_versions(&self) -> &'static str {
        ">=2.0.0"
    }

    fn reads(&self) -> &'static [DataSlot] {
        READS
    }

    fn generate(&self, ctx: &GenerateContext<'_>) -> Result<Vec<GeneratedOutput>, GeneratorError> {
        let mut outputs = Vec::new();

        for ns in ctx.schema.namespaces() {
            let Some(container) = ns.data.get(SCHEMA_CONTAINER) else {
                continue;
            };

            let xsd = render(container, ctx.target_version)?;
            debug!(namespace = %ns.namespace_name, bytes = xsd.len(), "rendered schema");

            outputs.push(GeneratedOutput {
                name: "XSD".into(),
                namespace: ns.namespace_name.clone(),
                folder_name: "XSD".into(),
                file_name: file_name(ns),
                content: OutputContent::Text(xsd),
            });
        }

        Ok(outputs)
    }
}

fn file_name(ns: &Namespace) -> String {
    if !ns.is_extension {
        return CORE_SCHEMA_FILE.to_string();
    }

    let prefix = if ns.project_extension.is_empty() {
        "EXTENSION"
    } else {
        ns.project_extension.as_str()
    };

    format!("{prefix}-Ed-Fi-Extended-Core.xsd")
}

// render
fn render(container: &SchemaContainer, target_version: SemVer) -> Result<String, GeneratorError> {
    let mut xsd = String::new();
    let target_namespace = format!("http://ed-fi.org/{target_version}");

    writeln!(xsd, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        xsd,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns="{target_namespace}" targetNamespace="{target_namespace}" elementFormDefault="qualified" attributeFormDefault="unqualified">"#
    )?;
    annotation(&mut xsd, 1, &container.documentation)?;
    if container.is_extension {
        writeln!(xsd, r#"  <xs:include schemaLocation="{CORE_SCHEMA_FILE}"/>"#)?;
    }

    for section in container.sections.iter().filter(|s| !s.is_empty()) {
        annotation(&mut xsd, 1, &section.documentation)?;
        for complex in &section.complex_types {
            complex_type(&mut xsd, complex)?;
        }
        for simple in &section.simple_types {
            simple_type(&mut xsd, simple)?;
        }
    }

    writeln!(xsd, "</xs:schema>")?;

    Ok(xsd)
}

fn annotation(xsd: &mut String, depth: usize, documentation: &str) -> Result<(), GeneratorError> {
    if documentation.is_empty() {
        return Ok(());
    }

    let pad = "  ".repeat(depth);
    writeln!(xsd, "{pad}<xs:annotation>")?;
    writeln!(xsd, "{pad}  <xs:documentation>{}</xs:documentation>", escape(documentation))?;
    writeln!(xsd, "{pad}</xs:annotation>")?;

    Ok(())
}

fn complex_type(xsd: &mut String, complex: &ComplexType) -> Result<(), GeneratorError> {
    let abstract_flag = if complex.is_abstract { r#" abstract="true""# } else { "" };
    writeln!(xsd, r#"  <xs:complexType name="{}"{abstract_flag}>"#, escape(&complex.name))?;
    annotation(xsd, 2, &complex.documentation)?;

    let depth = match &complex.base_type {
        Some(base) => {
            writeln!(xsd, "    <xs:complexContent>")?;
            writeln!(xsd, r#"      <xs:extension base="{}">"#, escape(base))?;
            4
        }
        None => 2,
    };
    let pad = "  ".repeat(depth);

    if !complex.elements.is_empty() {
        writeln!(xsd, "{pad}<xs:sequence>")?;
        for element in &complex.elements {
            let min = if element.min_occurs == 1 {
                String::new()
            } else {
                format!(r#" minOccurs="{}""#, element.min_occurs)
            };
            let max = if element.unbounded { r#" maxOccurs="unbounded""# } else { "" };
            writeln!(
                xsd,
                r#"{pad}  <xs:element name="{}" type="{}"{min}{max}/>"#,
                escape(&element.name),
                escape(&element.type_name)
            )?;
        }
        writeln!(xsd, "{pad}</xs:sequence>")?;
    }
    for attribute in &complex.attributes {
        writeln!(
            xsd,
            r#"{pad}<xs:attribute name="{}" type="{}"/>"#,
            escape(&attribute.name),
            escape(&attribute.type_name)
        )?;
    }

    if complex.base_type.is_some() {
        writeln!(xsd, "      </xs:extension>")?;
        writeln!(xsd, "    </xs:complexContent>")?;
    }
    writeln!(xsd, "  </xs:complexType>")?;

    Ok(())
}

fn simple_type(xsd: &mut String, simple: &SimpleType) -> Result<(), GeneratorError> {
    writeln!(xsd, r#"  <xs:simpleType name="{}">"#, escape(&simple.name))?;
    annotation(xsd, 2, &simple.documentation)?;

    if simple.facets.is_empty() {
        writeln!(xsd, r#"    <xs:restriction base="{}"/>"#, escape(&simple.base_type))?;
    } else {
        writeln!(xsd, r#"    <xs:restriction base="{}">"#, escape(&simple.base_type))?;
        for facet in &simple.facets {
            let (name, value) = facet.parts();
            writeln!(xsd, r#"      <xs:{name} value="{}"/>"#, escape(&value))?;
        }
        writeln!(xsd, "    </xs:restriction>")?;
    }
    writeln!(xsd, "  </xs:simpleType>")?;

    Ok(())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }

    out
}

///
/// TESTS
///
