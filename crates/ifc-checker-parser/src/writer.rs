// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP (ISO 10303-21) serialisation
//!
//! Output is deterministic: entities are written in the resolver's order and
//! the header carries no wall-clock timestamp unless the model has one.

use ifc_checker_model::{AttributeValue, DecodedEntity, Error, IfcModel, Result};
use std::fmt::{self, Write};
use std::path::Path;

/// Serialise a model as STEP text
pub fn to_step(model: &dyn IfcModel) -> String {
    let mut output = String::new();
    // Writing into a String cannot fail
    let _ = write_model(&mut output, model);
    output
}

/// Serialise a model and write it to `path`
pub fn write_to(model: &dyn IfcModel, path: &Path) -> Result<()> {
    std::fs::write(path, to_step(model)).map_err(|e| Error::file_access(path, e))
}

fn write_model(output: &mut String, model: &dyn IfcModel) -> fmt::Result {
    let meta = model.metadata();
    let text = |value: &Option<String>| encode_string(value.as_deref().unwrap_or(""));

    writeln!(output, "ISO-10303-21;")?;
    writeln!(output, "HEADER;")?;
    writeln!(
        output,
        "FILE_DESCRIPTION(({}),'2;1');",
        text(&meta.file_description)
    )?;
    writeln!(
        output,
        "FILE_NAME({},{},({}),({}),{},{},'');",
        text(&meta.file_name),
        text(&meta.timestamp),
        text(&meta.author),
        text(&meta.organization),
        text(&meta.preprocessor_version),
        text(&meta.originating_system),
    )?;
    writeln!(output, "FILE_SCHEMA(({}));", encode_string(&meta.schema_version))?;
    writeln!(output, "ENDSEC;")?;
    writeln!(output)?;

    writeln!(output, "DATA;")?;
    let resolver = model.resolver();
    for id in resolver.all_ids() {
        if let Some(entity) = resolver.get(id) {
            write_entity(output, &entity)?;
            output.push('\n');
        }
    }
    writeln!(output, "ENDSEC;")?;
    writeln!(output, "END-ISO-10303-21;")?;
    Ok(())
}

/// Write `#id=TYPE(attributes);`
pub fn write_entity(output: &mut String, entity: &DecodedEntity) -> fmt::Result {
    write!(output, "{}={}(", entity.id, entity.ifc_type.step_name())?;
    write_values(output, &entity.attributes)?;
    output.push_str(");");
    Ok(())
}

fn write_values(output: &mut String, values: &[AttributeValue]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        write_value(output, value)?;
    }
    Ok(())
}

fn write_value(output: &mut String, value: &AttributeValue) -> fmt::Result {
    match value {
        AttributeValue::Null => output.push('$'),
        AttributeValue::Derived => output.push('*'),
        AttributeValue::EntityRef(id) => write!(output, "{}", id)?,
        AttributeValue::Integer(i) => write!(output, "{}", i)?,
        AttributeValue::Float(f) => output.push_str(&format_real(*f)),
        AttributeValue::String(s) => output.push_str(&encode_string(s)),
        AttributeValue::Enum(e) => write!(output, ".{}.", e)?,
        AttributeValue::List(items) => {
            output.push('(');
            write_values(output, items)?;
            output.push(')');
        }
        AttributeValue::TypedValue(name, args) => {
            write!(output, "{}(", name.to_ascii_uppercase())?;
            write_values(output, args)?;
            output.push(')');
        }
    }
    Ok(())
}

/// Format a real so that it reads back as a real (`1.`, `0.25`, `1.5E-05`)
pub fn format_real(value: f64) -> String {
    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let dot = if mantissa.contains('.') { "" } else { "." };
            format!("{}{}E{}", mantissa, dot, exponent)
        }
        None if repr.ends_with(".0") => repr[..repr.len() - 1].to_string(),
        None => repr,
    }
}

/// Quote and escape a string for STEP output
///
/// Printable ASCII is written as is (with `'` and `\` doubled); anything
/// else goes through `\X2\...\X0\` UTF-16 escapes.
pub fn encode_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');

    let mut pending: Vec<u16> = Vec::new();
    let flush = |out: &mut String, pending: &mut Vec<u16>| {
        if pending.is_empty() {
            return;
        }
        out.push_str("\\X2\\");
        for unit in pending.drain(..) {
            // Writing into a String cannot fail
            let _ = write!(out, "{:04X}", unit);
        }
        out.push_str("\\X0\\");
    };

    for c in value.chars() {
        match c {
            ' '..='~' => {
                flush(&mut out, &mut pending);
                match c {
                    '\'' => out.push_str("''"),
                    '\\' => out.push_str("\\\\"),
                    _ => out.push(c),
                }
            }
            _ => {
                let mut buf = [0u16; 2];
                pending.extend_from_slice(c.encode_utf16(&mut buf));
            }
        }
    }
    flush(&mut out, &mut pending);

    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::decode_string;
    use crate::StepModel;
    use ifc_checker_model::EntityId;

    const TEST_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('house.ifc','',('Author'),('Org'),'Preprocessor','App','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCWALL('guid',$,'Wall ''A''',$,$,$,$,$,.NOTDEFINED.);
#2=IFCPROPERTYSINGLEVALUE('Width',$,IFCLENGTHMEASURE(0.2),$);
#3=IFCPROPERTYSINGLEVALUE('Count',$,IFCINTEGER(3),$);
#4=IFCPROPERTYSET('p',$,'Pset_Test',$,(#2,#3));
#5=IFCRELDEFINESBYPROPERTIES('r',$,$,$,(#1),#4);
#6=IFCCARTESIANPOINT((0.,1.5E-05,-2.));
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(1.0), "1.");
        assert_eq!(format_real(0.25), "0.25");
        assert_eq!(format_real(-2.0), "-2.");
        assert_eq!(format_real(1.5e-5), "1.5E-5");
        assert_eq!(format_real(1e-5), "1.E-5");
        assert_eq!(format_real(1e20), "1.E20");
    }

    #[test]
    fn test_encode_string() {
        assert_eq!(encode_string("it's"), "'it''s'");
        assert_eq!(encode_string("a\\b"), "'a\\\\b'");
        assert_eq!(encode_string("Grüße"), "'Gr\\X2\\00FC00DF\\X0\\e'");

        let tricky = "Wand \u{1F600} 'x' \\ ü";
        let encoded = encode_string(tricky);
        assert_eq!(decode_string(&encoded[1..encoded.len() - 1]), tricky);
    }

    #[test]
    fn test_written_model_reads_back_the_same() {
        let model = StepModel::parse(TEST_IFC).unwrap();
        let text = to_step(&model);
        let reread = StepModel::parse(&text).unwrap();

        assert_eq!(reread.metadata(), model.metadata());
        for id in model.resolver().all_ids() {
            assert_eq!(reread.resolver().get(id), model.resolver().get(id));
        }
        assert_eq!(to_step(&reread), text);
    }

    #[test]
    fn test_entity_line() {
        let model = StepModel::parse(TEST_IFC).unwrap();
        let wall = model.resolver().get(EntityId(1)).unwrap();
        let mut line = String::new();
        write_entity(&mut line, &wall).unwrap();
        assert_eq!(
            line,
            "#1=IFCWALL('guid',$,'Wall ''A''',$,$,$,$,$,.NOTDEFINED.);"
        );
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let model = StepModel::empty("IFC4");
        let err = write_to(&model, Path::new("/nonexistent-dir/out.ifc")).unwrap_err();
        assert!(err.is_file_access());
    }
}
