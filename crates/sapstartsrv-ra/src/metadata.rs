//! OCF resource agent description printed for `meta-data`.

use std::io::{self, Write};

/// Name the agent registers under.
pub const AGENT_NAME: &str = "SAPStartSrv";

const SHORT_DESC: &str = "Manages the sapstartsrv process of an SAP instance.";

const LONG_DESC: &str = "Manages the sapstartsrv process of an SAP instance as a \
resource. The agent starts sapstartsrv through its systemd unit when one is installed and \
launches it directly otherwise. It stops sapstartsrv through sapcontrol and checks whether \
the service answers sapcontrol requests.";

struct Parameter {
    name: &'static str,
    shortdesc: &'static str,
    longdesc: &'static str,
    required: bool,
}

const PARAMETERS: &[Parameter] = &[
    Parameter {
        name: "InstanceName",
        shortdesc: "Instance name: SID_INSTANCE_VIR-HOSTNAME",
        longdesc: "The full qualified SAP instance name. e.g. HA1_ASCS00_sapha1as. \
Usually this is the name of the SAP instance profile.",
        required: true,
    },
    Parameter {
        name: "START_PROFILE",
        shortdesc: "Start profile name",
        longdesc: "The name of the SAP Instance profile. Specify this parameter, if you \
have changed the name of the SAP Instance profile after the default SAP installation.",
        required: false,
    },
];

struct Action {
    name: &'static str,
    timeout: u32,
    interval: Option<u32>,
}

const ACTIONS: &[Action] = &[
    Action {
        name: "start",
        timeout: 60,
        interval: None,
    },
    Action {
        name: "stop",
        timeout: 60,
        interval: None,
    },
    Action {
        name: "status",
        timeout: 60,
        interval: None,
    },
    Action {
        name: "monitor",
        timeout: 20,
        interval: Some(120),
    },
    Action {
        name: "validate-all",
        timeout: 5,
        interval: None,
    },
    Action {
        name: "meta-data",
        timeout: 5,
        interval: None,
    },
];

/// Renders the resource agent XML.
#[must_use]
pub fn render() -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\"?>\n");
    xml.push_str("<!DOCTYPE resource-agent SYSTEM \"ra-api-1.dtd\">\n");
    xml.push_str(&format!("<resource-agent name=\"{AGENT_NAME}\">\n"));
    xml.push_str("<version>1.0</version>\n");
    xml.push_str(&format!("<longdesc lang=\"en\">{LONG_DESC}</longdesc>\n"));
    xml.push_str(&format!("<shortdesc lang=\"en\">{SHORT_DESC}</shortdesc>\n"));
    xml.push_str("<parameters>\n");
    for parameter in PARAMETERS {
        xml.push_str(&format!(
            "<parameter name=\"{}\" unique=\"1\" required=\"{}\">\n",
            parameter.name,
            u8::from(parameter.required)
        ));
        xml.push_str(&format!(
            "<longdesc lang=\"en\">{}</longdesc>\n",
            parameter.longdesc
        ));
        xml.push_str(&format!(
            "<shortdesc lang=\"en\">{}</shortdesc>\n",
            parameter.shortdesc
        ));
        xml.push_str("<content type=\"string\" default=\"\"/>\n");
        xml.push_str("</parameter>\n");
    }
    xml.push_str("</parameters>\n");
    xml.push_str("<actions>\n");
    for action in ACTIONS {
        match action.interval {
            Some(interval) => xml.push_str(&format!(
                "<action name=\"{}\" timeout=\"{}s\" interval=\"{interval}s\"/>\n",
                action.name, action.timeout
            )),
            None => xml.push_str(&format!(
                "<action name=\"{}\" timeout=\"{}s\"/>\n",
                action.name, action.timeout
            )),
        }
    }
    xml.push_str("</actions>\n");
    xml.push_str("</resource-agent>\n");
    xml
}

/// Writes the resource agent XML to `writer`.
///
/// # Errors
///
/// Returns any error raised by `writer`.
pub fn write<W: Write>(writer: &mut W) -> io::Result<()> {
    writer.write_all(render().as_bytes())?;
    writer.flush()
}
