//! Network exposure analysis for security groups
//!
//! - Private address range classification for ingress sources
//! - Attachment graph from resources to the security groups they use
//! - Public/private consistency between attachments and ingress rules

mod attachment;
mod cidr;
mod exposure;

pub use attachment::{collect_attachments, AttachmentKind, SecurityGroupAttachment};
pub use cidr::{is_private, Ipv4Block, PRIVATE_RANGES};
pub use exposure::{
    classify, Exposure, IngressRule, SecurityGroupGraph, SECURITY_GROUP, SECURITY_GROUP_INGRESS,
};
