//! Scenario tests for the checks

use super::*;
use crate::core::template::flatten;
use serde_json::json;

fn run(kind: CheckKind, template: Value, options: Value) -> Result<Vec<Finding>> {
    kind.run(&flatten(&template), &options)
}

fn load_balancer_setup(server_ingress: Value) -> Value {
    json!({
        "Resources": {
            "SGServer": {
                "Type": "AWS::EC2::SecurityGroup",
                "Properties": {"SecurityGroupIngress": [server_ingress]}
            },
            "SGLoadBalancer": {
                "Type": "AWS::EC2::SecurityGroup",
                "Properties": {
                    "SecurityGroupIngress": [{
                        "FromPort": 80, "ToPort": 80, "IpProtocol": "tcp", "CidrIp": "0.0.0.0/0"
                    }]
                }
            },
            "LoadBalancer": {
                "Type": "AWS::ElasticLoadBalancing::LoadBalancer",
                "Properties": {"SecurityGroups": [{"Ref": "SGLoadBalancer"}]}
            },
            "AutoScalingGroup": {
                "Type": "AWS::AutoScaling::AutoScalingGroup",
                "Properties": {
                    "LaunchConfigurationName": {"Ref": "LaunchConfiguration"},
                    "LoadBalancerNames": [{"Ref": "LoadBalancer"}]
                }
            },
            "LaunchConfiguration": {
                "Type": "AWS::AutoScaling::LaunchConfiguration",
                "Properties": {"SecurityGroups": [{"Ref": "SGServer"}]}
            }
        }
    })
}

#[test]
fn test_check_names() {
    for kind in CheckKind::ALL {
        assert_eq!(kind.name().parse::<CheckKind>().unwrap(), kind);
    }
    assert!(matches!(
        "logicalId".parse::<CheckKind>(),
        Err(CheckError::UnknownCheck(_))
    ));
}

#[test]
fn test_invalid_options() {
    let err = run(
        CheckKind::IamPolicy,
        json!({}),
        json!({"allow": "s3:*"}),
    )
    .unwrap_err();
    assert!(matches!(err, CheckError::InvalidOptions { ref check, .. } if check == "iamPolicy"));
}

#[test]
fn test_mis_keyed_iam_rule_is_rejected() {
    let template = json!({
        "Resources": {
            "Admin": {
                "Type": "AWS::IAM::ManagedPolicy",
                "Properties": {"PolicyDocument": {"Statement": [
                    {"Effect": "Allow", "Action": "*", "Resource": "*"}
                ]}}
            }
        }
    });

    let err = run(
        CheckKind::IamPolicy,
        template,
        json!({"allow": [{"Action": "s3:Get*"}]}),
    )
    .unwrap_err();
    assert!(matches!(err, CheckError::InvalidOptions { ref check, .. } if check == "iamPolicy"));
}

#[test]
fn test_secure_load_balancer_setup() {
    let template = load_balancer_setup(json!({
        "FromPort": 80, "ToPort": 80, "IpProtocol": "tcp",
        "SourceSecurityGroupId": {"Ref": "SGLoadBalancer"}
    }));

    assert!(run(CheckKind::SecurityGroupInbound, template, json!(true))
        .unwrap()
        .is_empty());
}

#[test]
fn test_public_rule_on_launch_configuration_group() {
    let template = load_balancer_setup(json!({
        "FromPort": 80, "ToPort": 80, "IpProtocol": "tcp", "CidrIp": "0.0.0.0/0"
    }));

    let findings = run(CheckKind::SecurityGroupInbound, template, json!(true)).unwrap();
    assert_eq!(
        findings,
        vec![Finding::new("SGServer", "public inbound rules for private attachments found")]
    );
}

#[test]
fn test_database_behind_servers() {
    let mut template = load_balancer_setup(json!({
        "FromPort": 80, "ToPort": 80, "IpProtocol": "tcp",
        "SourceSecurityGroupId": {"Ref": "SGLoadBalancer"}
    }));
    let resources = template["Resources"].as_object_mut().unwrap();
    resources.insert(
        "SGDatabase".to_string(),
        json!({
            "Type": "AWS::EC2::SecurityGroup",
            "Properties": {"SecurityGroupIngress": [{
                "FromPort": 3306, "ToPort": 3306, "IpProtocol": "tcp",
                "SourceSecurityGroupId": {"Ref": "SGServer"}
            }]}
        }),
    );
    resources.insert(
        "Database".to_string(),
        json!({
            "Type": "AWS::RDS::DBInstance",
            "Properties": {"VPCSecurityGroups": [{"Ref": "SGDatabase"}]}
        }),
    );

    assert!(run(CheckKind::SecurityGroupInbound, template.clone(), json!(true))
        .unwrap()
        .is_empty());

    template["Resources"]["SGDatabase"]["Properties"]["SecurityGroupIngress"][0] =
        json!({"FromPort": 3306, "ToPort": 3306, "IpProtocol": "tcp", "CidrIp": "0.0.0.0/0"});
    let findings = run(CheckKind::SecurityGroupInbound, template, json!(true)).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].logical_id, "SGDatabase");
}

#[test]
fn test_private_cidr_on_private_attachment() {
    let template = json!({
        "Resources": {
            "SgCache": {
                "Type": "AWS::EC2::SecurityGroup",
                "Properties": {"SecurityGroupIngress": [{"CidrIp": "172.16.0.0/12", "FromPort": 6379, "ToPort": 6379}]}
            },
            "Cache": {
                "Type": "AWS::ElastiCache::CacheCluster",
                "Properties": {"VpcSecurityGroupIds": [{"Fn::GetAtt": ["SgCache", "GroupId"]}]}
            }
        }
    });

    assert!(run(CheckKind::SecurityGroupInbound, template, json!(true))
        .unwrap()
        .is_empty());
}

#[test]
fn test_standalone_public_ingress_on_internal_load_balancer() {
    let template = json!({
        "Resources": {
            "SgInternal": {"Type": "AWS::EC2::SecurityGroup", "Properties": {}},
            "OpenHttp": {
                "Type": "AWS::EC2::SecurityGroupIngress",
                "Properties": {"GroupId": {"Ref": "SgInternal"}, "CidrIp": "0.0.0.0/0", "FromPort": 80, "ToPort": 80}
            },
            "InternalLb": {
                "Type": "AWS::ElasticLoadBalancing::LoadBalancer",
                "Properties": {"Scheme": "internal", "SecurityGroups": [{"Ref": "SgInternal"}]}
            }
        }
    });

    let findings = run(CheckKind::SecurityGroupInbound, template, json!(true)).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].logical_id, "SgInternal");
}

#[test]
fn test_vacuous_groups_are_compliant() {
    let template = json!({
        "Resources": {
            "Unattached": {
                "Type": "AWS::EC2::SecurityGroup",
                "Properties": {"SecurityGroupIngress": [{"CidrIp": "0.0.0.0/0"}]}
            },
            "NoRules": {"Type": "AWS::EC2::SecurityGroup", "Properties": {}},
            "Instance": {
                "Type": "AWS::EC2::Instance",
                "Properties": {"SecurityGroupIds": [{"Ref": "NoRules"}]}
            }
        }
    });

    assert!(run(CheckKind::SecurityGroupInbound, template, json!(true))
        .unwrap()
        .is_empty());
}

#[test]
fn test_unreadable_attachment_aborts() {
    let template = json!({
        "Resources": {
            "Sg": {"Type": "AWS::EC2::SecurityGroup", "Properties": {}},
            "Mount": {"Type": "AWS::EFS::MountTarget", "Properties": {"FileSystemId": "fs-1"}}
        }
    });

    let err = run(CheckKind::SecurityGroupInbound, template, json!(true)).unwrap_err();
    assert_eq!(err.to_string(), "can not find property SecurityGroups in Mount");
}

#[test]
fn test_attachments_ignored_without_security_groups() {
    let template = json!({
        "Resources": {
            "Mount": {"Type": "AWS::EFS::MountTarget", "Properties": {"FileSystemId": "fs-1"}}
        }
    });

    assert!(run(CheckKind::SecurityGroupInbound, template, json!(true))
        .unwrap()
        .is_empty());
}

#[test]
fn test_managed_policy_arns() {
    let template = json!({
        "Resources": {
            "Role": {
                "Type": "AWS::IAM::Role",
                "Properties": {"ManagedPolicyArns": ["arn:aws:iam::aws:policy/AdministratorAccess"]}
            }
        }
    });

    let findings = run(
        CheckKind::IamManagedPolicy,
        template.clone(),
        json!({"allow": ["arn:aws:iam::aws:policy/*ReadOnlyAccess"]}),
    )
    .unwrap();
    assert_eq!(
        findings,
        vec![Finding::new(
            "Role",
            "ManagedPolicyARN arn:aws:iam::aws:policy/AdministratorAccess not allowed"
        )]
    );

    let findings = run(
        CheckKind::IamManagedPolicy,
        template,
        json!({"deny": ["arn:aws:iam::aws:policy/Administrator*"]}),
    )
    .unwrap();
    assert_eq!(
        findings[0].message,
        "ManagedPolicyARN arn:aws:iam::aws:policy/AdministratorAccess denied"
    );
}

#[test]
fn test_managed_policy_read_only_allowed() {
    let template = json!({
        "Resources": {
            "Group": {
                "Type": "AWS::IAM::Group",
                "Properties": {"ManagedPolicyArns": ["arn:aws:iam::aws:policy/AmazonS3ReadOnlyAccess"]}
            },
            "Policy": {
                "Type": "AWS::IAM::ManagedPolicy",
                "Properties": {"PolicyDocument": {"Statement": []}}
            }
        }
    });

    assert!(run(
        CheckKind::IamManagedPolicy,
        template,
        json!({"allow": ["arn:aws:iam::aws:policy/*ReadOnlyAccess"]})
    )
    .unwrap()
    .is_empty());
}

#[test]
fn test_inline_policy_toggle() {
    let template = json!({
        "Resources": {
            "Standalone": {"Type": "AWS::IAM::Policy", "Properties": {}},
            "WithInline": {"Type": "AWS::IAM::User", "Properties": {"Policies": []}},
            "WithoutInline": {"Type": "AWS::IAM::Role", "Properties": {}},
            "Managed": {"Type": "AWS::IAM::ManagedPolicy", "Properties": {}}
        }
    });

    assert!(run(CheckKind::IamInlinePolicy, template.clone(), json!(true))
        .unwrap()
        .is_empty());

    let findings = run(CheckKind::IamInlinePolicy, template, json!(false)).unwrap();
    let ids: Vec<&str> = findings.iter().map(|f| f.logical_id.as_str()).collect();
    assert_eq!(ids, vec!["Standalone", "WithInline"]);
    assert!(findings.iter().all(|f| f.message == "Inline Policy not allowed"));
}

#[test]
fn test_resource_type_lists() {
    let template = json!({
        "Parameters": {"Env": {"Type": "String"}},
        "Resources": {
            "Topic": {"Type": "AWS::SNS::Topic"},
            "Ip": {"Type": "AWS::EC2::EIP"}
        }
    });

    let findings = run(
        CheckKind::ResourceType,
        template.clone(),
        json!({"allow": ["AWS::SNS::Topic"]}),
    )
    .unwrap();
    assert_eq!(findings, vec![Finding::new("Ip", "Resource Type AWS::EC2::EIP not allowed")]);

    let findings = run(
        CheckKind::ResourceType,
        template,
        json!({"allow": ["AWS::EC2::EIP"], "deny": ["AWS::EC2::EIP"]}),
    )
    .unwrap();
    let messages: Vec<&str> = findings.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Resource Type AWS::SNS::Topic not allowed",
            "Resource Type AWS::EC2::EIP denied"
        ]
    );
}

#[test]
fn test_logical_id_all_sections() {
    let template = json!({
        "Parameters": {"res1": {}},
        "Mappings": {"res2": {}},
        "Conditions": {"res3": {}},
        "Resources": {"res4": {}},
        "Outputs": {"res5": {}}
    });

    let pascal = run(CheckKind::LogicalId, template.clone(), json!(true)).unwrap();
    assert_eq!(pascal.len(), 5);
    assert_eq!(pascal[0].message, "Logical ID does not match pascalcase");

    let camel = run(CheckKind::LogicalId, template, json!({"case": "camel"})).unwrap();
    assert!(camel.is_empty());
}

#[test]
fn test_conditional_attachment_and_rules() {
    let template = json!({
        "Resources": {
            "SgDatabase": {
                "Type": "AWS::EC2::SecurityGroup",
                "Properties": {"SecurityGroupIngress": {"Fn::If": [
                    "OpenForDebugging",
                    [{"CidrIp": "0.0.0.0/0", "FromPort": 3306, "ToPort": 3306}],
                    {"Ref": "AWS::NoValue"}
                ]}}
            },
            "Database": {
                "Type": "AWS::RDS::DBInstance",
                "Properties": {"VPCSecurityGroups": {"Fn::If": [
                    "IsProd", [{"Ref": "SgDatabase"}], [{"Ref": "SgDatabase"}]
                ]}}
            }
        }
    });

    let findings = run(CheckKind::SecurityGroupInbound, template, json!(true)).unwrap();
    assert_eq!(
        findings,
        vec![Finding::new("SgDatabase", "public inbound rules for private attachments found")]
    );
}

#[test]
fn test_unreadable_ingress_list_aborts() {
    let template = json!({
        "Resources": {
            "SgDatabase": {
                "Type": "AWS::EC2::SecurityGroup",
                "Properties": {"SecurityGroupIngress": "0.0.0.0/0"}
            },
            "Database": {
                "Type": "AWS::RDS::DBInstance",
                "Properties": {"VPCSecurityGroups": [{"Ref": "SgDatabase"}]}
            }
        }
    });

    let err = run(CheckKind::SecurityGroupInbound, template, json!(true)).unwrap_err();
    assert!(matches!(
        err,
        CheckError::InvalidProperty { ref logical_id, ref property }
            if logical_id == "SgDatabase" && property == "SecurityGroupIngress"
    ));
}
