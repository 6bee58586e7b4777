use cfstack::aws::{Stack, StackResource, StackResourceDetail};
use cfstack::stack_status::Status;
use chrono::{DateTime, Utc};
use eyre::{Result, WrapErr};
use std::convert::TryFrom;
use term_table::row::Row;
use term_table::table_cell::TableCell;
use term_table::Table;
use termcolor::WriteColor;

fn write_status<W: WriteColor>(w: &mut W, status: Option<&str>) -> Result<()> {
    let status = match status {
        Some(status) => status,
        None => {
            write!(w, "UNKNOWN").wrap_err("printing status")?;
            return Ok(());
        }
    };

    match Status::try_from(status) {
        Ok(parsed) => {
            w.set_color(&parsed.color_spec()).wrap_err("setting color")?;
            write!(w, "{}", status).wrap_err("printing status")?;
            w.reset().wrap_err("resetting colour")?;
        }
        Err(e) => {
            tracing::warn!(err = %e, "unrecognised status");
            write!(w, "{}", status).wrap_err("printing status")?;
        }
    }
    Ok(())
}

fn write_reason<W: WriteColor>(w: &mut W, reason: Option<&str>) -> Result<()> {
    match reason {
        Some(reason) => writeln!(w, " ({})", reason).wrap_err("printing status reason"),
        None => writeln!(w).wrap_err("printing end of line"),
    }
}

fn write_field<W: WriteColor>(w: &mut W, name: &str, value: Option<&str>) -> Result<()> {
    if let Some(value) = value {
        writeln!(w, "  {}: {}", name, value).wrap_err_with(|| format!("printing {}", name))?;
    }
    Ok(())
}

fn format_time(dt: Option<&DateTime<Utc>>) -> Option<String> {
    dt.map(|dt| dt.to_rfc3339())
}

fn table(header: &[&str], rows: impl IntoIterator<Item = Vec<String>>) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(
        header.iter().map(|h| TableCell::new(h)).collect::<Vec<_>>(),
    ));
    for row in rows {
        table.add_row(Row::new(
            row.into_iter().map(TableCell::new).collect::<Vec<_>>(),
        ));
    }
    table.render()
}

pub(crate) fn stack<W: WriteColor>(w: &mut W, stack: &Stack) -> Result<()> {
    write!(w, "{} | ", stack.stack_name).wrap_err("printing stack name")?;
    write_status(w, stack.stack_status.as_deref())?;
    write_reason(w, stack.stack_status_reason.as_deref())?;

    write_field(w, "id", stack.stack_id.as_deref())?;
    write_field(w, "description", stack.description.as_deref())?;
    write_field(w, "created", format_time(stack.creation_time.as_ref()).as_deref())?;
    write_field(w, "updated", format_time(stack.last_updated_time.as_ref()).as_deref())?;
    if !stack.capabilities.is_empty() {
        write_field(w, "capabilities", Some(stack.capabilities.join(", ").as_str()))?;
    }

    if !stack.parameters.is_empty() {
        let rows = stack
            .parameters
            .iter()
            .map(|(key, value)| vec![key.clone(), value.clone()]);
        write!(w, "{}", table(&["Parameter", "Value"], rows)).wrap_err("printing parameters")?;
    }

    if !stack.outputs.is_empty() {
        let rows = stack.outputs.iter().map(|o| {
            vec![
                o.key.clone(),
                o.value.clone(),
                o.description.clone().unwrap_or_default(),
            ]
        });
        write!(w, "{}", table(&["Output", "Value", "Description"], rows))
            .wrap_err("printing outputs")?;
    }

    Ok(())
}

pub(crate) fn resource_detail<W: WriteColor>(w: &mut W, detail: &StackResourceDetail) -> Result<()> {
    write!(
        w,
        "{} ({}) | ",
        detail.logical_resource_id, detail.resource_type
    )
    .wrap_err("printing resource name")?;
    write_status(w, detail.resource_status.as_deref())?;
    write_reason(w, detail.resource_status_reason.as_deref())?;

    write_field(w, "physical id", detail.physical_resource_id.as_deref())?;
    write_field(w, "stack", detail.stack_name.as_deref())?;
    write_field(w, "description", detail.description.as_deref())?;
    write_field(
        w,
        "updated",
        format_time(detail.last_updated_timestamp.as_ref()).as_deref(),
    )?;
    write_field(w, "metadata", detail.metadata.as_deref())?;
    Ok(())
}

/// Print resources as a table. Cells stay uncoloured: term-table sizes columns
/// from the raw cell text, so colour escapes would break the alignment.
pub(crate) fn resources<W: WriteColor>(w: &mut W, resources: &[StackResource]) -> Result<()> {
    if resources.is_empty() {
        writeln!(w, "no resources").wrap_err("printing resources")?;
        return Ok(());
    }

    let rows = resources.iter().map(|r| {
        vec![
            r.logical_resource_id.clone(),
            r.resource_type.clone(),
            r.physical_resource_id.clone().unwrap_or_default(),
            r.resource_status.clone().unwrap_or_default(),
        ]
    });
    write!(
        w,
        "{}",
        table(&["Logical ID", "Type", "Physical ID", "Status"], rows)
    )
    .wrap_err("printing resources")?;
    Ok(())
}
