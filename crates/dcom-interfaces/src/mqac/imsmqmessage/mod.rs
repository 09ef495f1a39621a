//! IMSMQMessage (MS-MQMQ automation)
//!
//! Property accessors of an MSMQ message plus `Send`. Derives from
//! IDispatch and owns opnums 7 to 55. Getters and setters of one property
//! share the property's operation name.

/// The IMSMQMessage method table, in opnum order.
///
/// Each entry is `CONST = opnum, operation, method, "Property", request,
/// response`. Request and response aliases that name a generic payload are
/// declared by `protocol`; `SendRequest` is a dedicated struct. The table is
/// handed to `callback`, which expands it into operations, the server trait
/// and the client methods.
macro_rules! message_operations {
    ($callback:ident) => {
        $callback! {
            GET_CLASS = 7, GetClassOperation, get_class, "Class",
                GetClassRequest = OrpcRequest, GetClassResponse = ValueResponse<i32>;
            GET_PRIV_LEVEL = 8, GetPrivLevelOperation, get_priv_level, "PrivLevel",
                GetPrivLevelRequest = OrpcRequest, GetPrivLevelResponse = ValueResponse<i32>;
            SET_PRIV_LEVEL = 9, SetPrivLevelOperation, set_priv_level, "PrivLevel",
                SetPrivLevelRequest = ValueRequest<i32>, SetPrivLevelResponse = OrpcResponse;
            GET_AUTH_LEVEL = 10, GetAuthLevelOperation, get_auth_level, "AuthLevel",
                GetAuthLevelRequest = OrpcRequest, GetAuthLevelResponse = ValueResponse<i32>;
            SET_AUTH_LEVEL = 11, SetAuthLevelOperation, set_auth_level, "AuthLevel",
                SetAuthLevelRequest = ValueRequest<i32>, SetAuthLevelResponse = OrpcResponse;
            GET_IS_AUTHENTICATED = 12, GetIsAuthenticatedOperation, get_is_authenticated, "IsAuthenticated",
                GetIsAuthenticatedRequest = OrpcRequest, GetIsAuthenticatedResponse = ValueResponse<i16>;
            GET_DELIVERY = 13, GetDeliveryOperation, get_delivery, "Delivery",
                GetDeliveryRequest = OrpcRequest, GetDeliveryResponse = ValueResponse<i32>;
            SET_DELIVERY = 14, SetDeliveryOperation, set_delivery, "Delivery",
                SetDeliveryRequest = ValueRequest<i32>, SetDeliveryResponse = OrpcResponse;
            GET_TRACE = 15, GetTraceOperation, get_trace, "Trace",
                GetTraceRequest = OrpcRequest, GetTraceResponse = ValueResponse<i32>;
            SET_TRACE = 16, SetTraceOperation, set_trace, "Trace",
                SetTraceRequest = ValueRequest<i32>, SetTraceResponse = OrpcResponse;
            GET_PRIORITY = 17, GetPriorityOperation, get_priority, "Priority",
                GetPriorityRequest = OrpcRequest, GetPriorityResponse = ValueResponse<i32>;
            SET_PRIORITY = 18, SetPriorityOperation, set_priority, "Priority",
                SetPriorityRequest = ValueRequest<i32>, SetPriorityResponse = OrpcResponse;
            GET_JOURNAL = 19, GetJournalOperation, get_journal, "Journal",
                GetJournalRequest = OrpcRequest, GetJournalResponse = ValueResponse<i32>;
            SET_JOURNAL = 20, SetJournalOperation, set_journal, "Journal",
                SetJournalRequest = ValueRequest<i32>, SetJournalResponse = OrpcResponse;
            GET_RESPONSE_QUEUE_INFO = 21, GetResponseQueueInfoOperation, get_response_queue_info, "ResponseQueueInfo",
                GetResponseQueueInfoRequest = OrpcRequest,
                GetResponseQueueInfoResponse = ValueResponse<Option<InterfacePointer>>;
            SET_BY_REF_RESPONSE_QUEUE_INFO = 22, SetByRefResponseQueueInfoOperation, set_by_ref_response_queue_info, "ResponseQueueInfo",
                SetByRefResponseQueueInfoRequest = ValueRequest<Option<InterfacePointer>>,
                SetByRefResponseQueueInfoResponse = OrpcResponse;
            GET_APP_SPECIFIC = 23, GetAppSpecificOperation, get_app_specific, "AppSpecific",
                GetAppSpecificRequest = OrpcRequest, GetAppSpecificResponse = ValueResponse<i32>;
            SET_APP_SPECIFIC = 24, SetAppSpecificOperation, set_app_specific, "AppSpecific",
                SetAppSpecificRequest = ValueRequest<i32>, SetAppSpecificResponse = OrpcResponse;
            GET_SOURCE_MACHINE_GUID = 25, GetSourceMachineGUIDOperation, get_source_machine_guid, "SourceMachineGuid",
                GetSourceMachineGUIDRequest = OrpcRequest, GetSourceMachineGUIDResponse = ValueResponse<Option<Bstr>>;
            GET_BODY_LENGTH = 26, GetBodyLengthOperation, get_body_length, "BodyLength",
                GetBodyLengthRequest = OrpcRequest, GetBodyLengthResponse = ValueResponse<i32>;
            GET_BODY = 27, GetBodyOperation, get_body, "Body",
                GetBodyRequest = OrpcRequest, GetBodyResponse = ValueResponse<Option<Variant>>;
            SET_BODY = 28, SetBodyOperation, set_body, "Body",
                SetBodyRequest = ValueRequest<Option<Variant>>, SetBodyResponse = OrpcResponse;
            GET_ADMIN_QUEUE_INFO = 29, GetAdminQueueInfoOperation, get_admin_queue_info, "AdminQueueInfo",
                GetAdminQueueInfoRequest = OrpcRequest,
                GetAdminQueueInfoResponse = ValueResponse<Option<InterfacePointer>>;
            SET_BY_REF_ADMIN_QUEUE_INFO = 30, SetByRefAdminQueueInfoOperation, set_by_ref_admin_queue_info, "AdminQueueInfo",
                SetByRefAdminQueueInfoRequest = ValueRequest<Option<InterfacePointer>>,
                SetByRefAdminQueueInfoResponse = OrpcResponse;
            GET_ID = 31, GetIDOperation, get_id, "Id",
                GetIDRequest = OrpcRequest, GetIDResponse = ValueResponse<Option<Variant>>;
            GET_CORRELATION_ID = 32, GetCorrelationIDOperation, get_correlation_id, "CorrelationId",
                GetCorrelationIDRequest = OrpcRequest, GetCorrelationIDResponse = ValueResponse<Option<Variant>>;
            SET_CORRELATION_ID = 33, SetCorrelationIDOperation, set_correlation_id, "CorrelationId",
                SetCorrelationIDRequest = ValueRequest<Option<Variant>>, SetCorrelationIDResponse = OrpcResponse;
            GET_ACK = 34, GetAckOperation, get_ack, "Ack",
                GetAckRequest = OrpcRequest, GetAckResponse = ValueResponse<i32>;
            SET_ACK = 35, SetAckOperation, set_ack, "Ack",
                SetAckRequest = ValueRequest<i32>, SetAckResponse = OrpcResponse;
            GET_LABEL = 36, GetLabelOperation, get_label, "Label",
                GetLabelRequest = OrpcRequest, GetLabelResponse = ValueResponse<Option<Bstr>>;
            SET_LABEL = 37, SetLabelOperation, set_label, "Label",
                SetLabelRequest = ValueRequest<Option<Bstr>>, SetLabelResponse = OrpcResponse;
            GET_MAX_TIME_TO_REACH_QUEUE = 38, GetMaxTimeToReachQueueOperation, get_max_time_to_reach_queue, "MaxTimeToReachQueue",
                GetMaxTimeToReachQueueRequest = OrpcRequest, GetMaxTimeToReachQueueResponse = ValueResponse<i32>;
            SET_MAX_TIME_TO_REACH_QUEUE = 39, SetMaxTimeToReachQueueOperation, set_max_time_to_reach_queue, "MaxTimeToReachQueue",
                SetMaxTimeToReachQueueRequest = ValueRequest<i32>, SetMaxTimeToReachQueueResponse = OrpcResponse;
            GET_MAX_TIME_TO_RECEIVE = 40, GetMaxTimeToReceiveOperation, get_max_time_to_receive, "MaxTimeToReceive",
                GetMaxTimeToReceiveRequest = OrpcRequest, GetMaxTimeToReceiveResponse = ValueResponse<i32>;
            SET_MAX_TIME_TO_RECEIVE = 41, SetMaxTimeToReceiveOperation, set_max_time_to_receive, "MaxTimeToReceive",
                SetMaxTimeToReceiveRequest = ValueRequest<i32>, SetMaxTimeToReceiveResponse = OrpcResponse;
            GET_HASH_ALGORITHM = 42, GetHashAlgorithmOperation, get_hash_algorithm, "HashAlgorithm",
                GetHashAlgorithmRequest = OrpcRequest, GetHashAlgorithmResponse = ValueResponse<i32>;
            SET_HASH_ALGORITHM = 43, SetHashAlgorithmOperation, set_hash_algorithm, "HashAlgorithm",
                SetHashAlgorithmRequest = ValueRequest<i32>, SetHashAlgorithmResponse = OrpcResponse;
            GET_ENCRYPT_ALGORITHM = 44, GetEncryptAlgorithmOperation, get_encrypt_algorithm, "EncryptAlgorithm",
                GetEncryptAlgorithmRequest = OrpcRequest, GetEncryptAlgorithmResponse = ValueResponse<i32>;
            SET_ENCRYPT_ALGORITHM = 45, SetEncryptAlgorithmOperation, set_encrypt_algorithm, "EncryptAlgorithm",
                SetEncryptAlgorithmRequest = ValueRequest<i32>, SetEncryptAlgorithmResponse = OrpcResponse;
            GET_SENT_TIME = 46, GetSentTimeOperation, get_sent_time, "SentTime",
                GetSentTimeRequest = OrpcRequest, GetSentTimeResponse = ValueResponse<Option<Variant>>;
            GET_ARRIVED_TIME = 47, GetArrivedTimeOperation, get_arrived_time, "ArrivedTime",
                GetArrivedTimeRequest = OrpcRequest, GetArrivedTimeResponse = ValueResponse<Option<Variant>>;
            GET_DESTINATION_QUEUE_INFO = 48, GetDestinationQueueInfoOperation, get_destination_queue_info, "DestinationQueueInfo",
                GetDestinationQueueInfoRequest = OrpcRequest,
                GetDestinationQueueInfoResponse = ValueResponse<Option<InterfacePointer>>;
            GET_SENDER_CERTIFICATE = 49, GetSenderCertificateOperation, get_sender_certificate, "SenderCertificate",
                GetSenderCertificateRequest = OrpcRequest, GetSenderCertificateResponse = ValueResponse<Option<Variant>>;
            SET_SENDER_CERTIFICATE = 50, SetSenderCertificateOperation, set_sender_certificate, "SenderCertificate",
                SetSenderCertificateRequest = ValueRequest<Option<Variant>>, SetSenderCertificateResponse = OrpcResponse;
            GET_SENDER_ID = 51, GetSenderIDOperation, get_sender_id, "SenderId",
                GetSenderIDRequest = OrpcRequest, GetSenderIDResponse = ValueResponse<Option<Variant>>;
            GET_SENDER_ID_TYPE = 52, GetSenderIDTypeOperation, get_sender_id_type, "SenderIdType",
                GetSenderIDTypeRequest = OrpcRequest, GetSenderIDTypeResponse = ValueResponse<i32>;
            SET_SENDER_ID_TYPE = 53, SetSenderIDTypeOperation, set_sender_id_type, "SenderIdType",
                SetSenderIDTypeRequest = ValueRequest<i32>, SetSenderIDTypeResponse = OrpcResponse;
            SEND = 54, SendOperation, send, "Send",
                SendRequest, SendResponse = OrpcResponse;
            ATTACH_CURRENT_SECURITY_CONTEXT = 55, AttachCurrentSecurityContextOperation, attach_current_security_context, "AttachCurrentSecurityContext",
                AttachCurrentSecurityContextRequest = OrpcRequest, AttachCurrentSecurityContextResponse = OrpcResponse;
        }
    };
}

mod client;
mod protocol;
mod server;

pub use client::*;
pub use protocol::*;
pub use server::*;
