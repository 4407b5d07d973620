/// Short codes for well-known service log names, matched on the file
/// stem.
pub fn file_code(stem: &str) -> Option<&'static str> {
    let code = match stem {
        // Cinder
        "scheduler" => "SCH",
        "volume" => "VOL",
        "backup" => "BAK",
        "cinder-manage" => "MNG",
        // Nova
        "nova-api" => "API",
        "nova-cert" | "cert" => "CRT",
        "nova-compute" | "compute" => "CPU",
        "nova-conductor" | "conductor" => "COND",
        "nova-consoleauth" | "consoleauth" => "CAUTH",
        "network" => "NET",
        "nova-manage" => "MNG",
        "nova-scheduler" => "SCH",
        "nova-novncproxy" => "NOVNC",
        "keystone" => "KEY",
        "horizon" => "HRZN",
        // Neutron
        "registry" => "REG",
        "openvswitch-agent" => "AGT",
        "dhcp-agent" => "DHCP",
        "l3-agent" => "L3",
        "lbaas-agent" => "LBAAS",
        "metadata-agent" => "META",
        "metering-agent" => "MTR",
        "server" => "API",
        "linuxbridge-agent" => "SVC",
        "netprobe" => "NET",
        // Heat
        "heat-api" => "API",
        "heat-engine" => "ENG",
        "heat-manage" => "MNG",
        // Ceilometer
        "agent-notification" => "NOTIF",
        "alarm-evaluator" => "EVAL",
        "alarm-notifier" => "ALRM",
        "ceilometer-dbsync" => "DBSY",
        "central" => "CENT",
        "collector" => "COLL",
        _ => return None,
    };
    Some(code)
}

/// One-letter project codes for a log's parent directory.
pub fn dir_code(dir: &str) -> Option<&'static str> {
    let code = match dir {
        "nova" => "N",
        "glance" => "G",
        "cinder" => "C",
        "keystone" => "K",
        "neutron" => "Q",
        "swift" => "S",
        "heat" => "H",
        "ceilometer" => "T",
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(file_code("volume"), Some("VOL"));
        assert_eq!(file_code("nova-compute"), Some("CPU"));
        assert_eq!(file_code("compute"), Some("CPU"));
        assert_eq!(file_code("api"), None);
        assert_eq!(dir_code("neutron"), Some("Q"));
        assert_eq!(dir_code("/neutron"), None);
    }
}
