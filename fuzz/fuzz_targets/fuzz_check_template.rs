#![no_main]
use cfn_check::{check_str, ChecksConfig};
use libfuzzer_sys::fuzz_target;

// Arbitrary template bytes must produce findings or an error, never a panic
fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    let config = ChecksConfig::from_json_str(
        r#"{
            "logicalID": true,
            "iamPolicy": {"allow": [{"action": "s3:*"}], "deny": ["iam:*"]},
            "iamManagedPolicy": {"deny": ["*Administrator*"]},
            "iamInlinePolicy": false,
            "resourceType": {"deny": ["AWS::EC2::EIP"]},
            "securityGroupInbound": true
        }"#,
    );

    if let Ok(config) = config {
        let _ = check_str(json, &config);
    }
});
