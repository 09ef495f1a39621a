//! MSMQ ActiveX automation interfaces (MS-MQMQ)

pub mod imsmqmessage;
pub mod imsmqquery3;
