//! Output formatting for sockid-dump.

use std::io::{self, Write};

use sockid::NetworkIdentity;

/// Print the record as one ss-like line plus the socket-only fields.
pub fn print_text(record: &NetworkIdentity) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let flow = record.flow();
    writeln!(handle, "{}", flow)?;
    writeln!(
        handle,
        "\thandle:{:#x} type:{} mark:{:#x} priority:{}",
        flow.handle,
        flow.socket_type.name(),
        flow.mark,
        flow.priority
    )?;
    Ok(())
}

/// Print the record in JSON format.
pub fn print_json(record: &NetworkIdentity) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    serde_json::to_writer_pretty(&mut handle, &record_to_json(record))?;
    writeln!(handle)?;
    Ok(())
}

/// Print the wire record as lowercase hex on one line.
pub fn print_raw(record: &NetworkIdentity) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", raw_line(record))
}

fn raw_line(record: &NetworkIdentity) -> String {
    hex::encode(record.as_bytes())
}

fn record_to_json(record: &NetworkIdentity) -> serde_json::Value {
    let flow = record.flow();
    let mut json = serde_json::json!({
        "family": flow.family.name(),
        "protocol": flow.protocol.name(),
        "state": flow.state.name(),
        "type": flow.socket_type.name(),
        "mark": flow.mark,
        "priority": flow.priority,
        "handle": format!("{:#x}", flow.handle),
    });

    if let (Some(local), Some(remote)) = (flow.local(), flow.remote()) {
        json["local"] = serde_json::json!({
            "address": local.ip().to_string(),
            "port": local.port(),
        });
        json["remote"] = serde_json::json!({
            "address": remote.ip().to_string(),
            "port": remote.port(),
        });
    }

    json["raw"] = serde_json::json!({
        "family": record.tuple.family,
        "protocol": record.tuple.protocol,
        "state": record.state,
        "type": record.socket_type,
    });

    json
}
