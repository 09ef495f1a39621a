//! ICatalogUtils / IMSMQQuery3 loopback demo
//!
//! Registers a small in-process catalog and queue directory, then calls them
//! through the generated clients. Every call goes through the full NDR
//! marshalling path in both directions.
//!
//! Usage:
//!   catalog-loopback --principal alice --password secret
//!   catalog-loopback --iid "{00000000-0000-0000-c000-000000000046}" --verbose
//!   catalog-loopback --big-endian

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use dcom::idispatch::DispatchServer;
use dcom::iunknown::UnknownServer;
use dcom::midl_ndr::NdrContext;
use dcom::oaut::Variant;
use dcom::payload::ValueResponse;
use dcom::{
    CallOptions, ClientConfig, DcomError, Hresult, InterfacePointer, Ipid, LoopbackConfig, LoopbackConn,
    ServerRegistry,
};
use dcom_interfaces::coma::icatalogutils::*;
use dcom_interfaces::mqac::imsmqquery3::*;
use parking_lot::Mutex;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "catalog-loopback")]
#[command(version)]
#[command(about = "Drive ICatalogUtils and IMSMQQuery3 stubs over an in-process transport")]
struct Args {
    /// Principal passed to ValidateUser
    #[arg(long, default_value = "alice")]
    principal: String,

    /// Password passed to ValidateUser; empty goes out as a null pointer
    #[arg(long, default_value = "")]
    password: String,

    /// Interface id to look up event classes for
    #[arg(long, default_value = "{00000000-0000-0000-c000-000000000046}")]
    iid: String,

    /// Queue label to look up
    #[arg(long, default_value = "orders")]
    label: String,

    /// Log every marshal and dispatch step
    #[arg(short, long)]
    verbose: bool,

    /// Marshal with big-endian data representation
    #[arg(long)]
    big_endian: bool,
}

/// Catalog with a fixed credential list and event class table
struct Catalog {
    users: HashMap<String, String>,
    event_classes: HashMap<String, Vec<(String, String, String)>>,
    pending_writes: Mutex<u32>,
}

impl Catalog {
    fn sample() -> Self {
        let mut users = HashMap::new();
        users.insert("alice".to_string(), "secret".to_string());

        let mut event_classes = HashMap::new();
        event_classes.insert(
            "{00000000-0000-0000-c000-000000000046}".to_string(),
            vec![
                (
                    "{ecfbd5e2-7f1c-4ad9-9ad3-24d2e1c4b2a0}".to_string(),
                    "Catalog.ObjectEvents.1".to_string(),
                    "Object lifetime events".to_string(),
                ),
                (
                    "{b51c4b33-0a07-4df8-a4a4-5fd86e1e61c2}".to_string(),
                    "Catalog.AppEvents.1".to_string(),
                    String::new(),
                ),
            ],
        );

        Self {
            users,
            event_classes,
            pending_writes: Mutex::new(3),
        }
    }
}

impl UnknownServer for Catalog {}

#[async_trait]
impl CatalogUtilsServer for Catalog {
    async fn validate_user(&self, request: ValidateUserRequest) -> dcom::Result<ValidateUserResponse> {
        match self.users.get(&request.principal_name) {
            Some(password) if *password == request.password => Ok(ValidateUserResponse::new(Hresult::S_OK)),
            Some(_) => Err(DcomError::Status(Hresult::E_ACCESSDENIED)),
            None => Ok(ValidateUserResponse::new(Hresult::S_FALSE)),
        }
    }

    async fn wait_for_end_writes(&self, _request: WaitForEndWritesRequest) -> dcom::Result<WaitForEndWritesResponse> {
        let mut pending = self.pending_writes.lock();
        info!(pending = *pending, "flushing catalog writes");
        *pending = 0;
        Ok(WaitForEndWritesResponse::new(Hresult::S_OK))
    }

    async fn get_event_classes_for_iid(
        &self,
        request: GetEventClassesForIIDRequest,
    ) -> dcom::Result<GetEventClassesForIIDResponse> {
        let classes = self.event_classes.get(&request.iid).cloned().unwrap_or_default();
        let mut response = GetEventClassesForIIDResponse::default();
        for (class_id, prog_id, description) in classes {
            response.class_ids.push(class_id);
            response.prog_ids.push(prog_id);
            response.descriptions.push(description);
        }
        Ok(response)
    }
}

/// Queue directory keyed by label
struct Directory {
    queues: HashMap<String, Vec<u8>>,
}

impl UnknownServer for Directory {}
impl DispatchServer for Directory {}

#[async_trait]
impl Query3Server for Directory {
    async fn lookup_queue_v2(&self, request: LookupQueueV2Request) -> dcom::Result<LookupQueueV2Response> {
        let label = request.filter.label.as_ref().and_then(Variant::as_str).unwrap_or_default();
        match self.queues.get(label) {
            Some(objref) => Ok(ValueResponse::new(Some(InterfacePointer::new(objref.clone())))),
            None => Err(DcomError::Status(Hresult::MQ_ERROR_QUEUE_NOT_FOUND)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let context = if args.big_endian {
        NdrContext::big_endian()
    } else {
        NdrContext::new()
    };

    let registry = Arc::new(ServerRegistry::new());
    let conn = Arc::new(LoopbackConn::with_config(registry, LoopbackConfig { context }));

    let catalog_ipid = Ipid::generate();
    conn.register(
        catalog_ipid,
        CATALOG_UTILS_INFO.name,
        new_catalog_utils_server_handle(Arc::new(Catalog::sample())),
    );

    let query_ipid = Ipid::generate();
    let mut queues = HashMap::new();
    queues.insert("orders".to_string(), b"MEOW\x01\x00\x00\x00".to_vec());
    conn.register(
        query_ipid,
        QUERY3_INFO.name,
        new_query3_server_handle(Arc::new(Directory { queues })),
    );

    let config = ClientConfig::new()
        .with_context(context)
        .with_default_timeout(Duration::from_secs(5));
    let catalog = CatalogUtilsClient::new(conn.clone())
        .with_config(config.clone())
        .with_ipid(catalog_ipid);
    let query = Query3Client::new(conn.clone()).with_config(config).with_ipid(query_ipid);
    let opts = CallOptions::new();

    info!(principal = %args.principal, "ValidateUser");
    match catalog
        .validate_user(ValidateUserRequest::new(args.principal.as_str(), args.password.as_str()), &opts)
        .await
    {
        Ok(_) => info!("credentials accepted"),
        Err(err) => warn!(error = %err, "credentials rejected"),
    }

    catalog.wait_for_end_writes(WaitForEndWritesRequest::new(), &opts).await?;
    info!("catalog writes flushed");

    let classes = catalog
        .get_event_classes_for_iid(GetEventClassesForIIDRequest::new(args.iid.as_str()), &opts)
        .await?;
    info!(iid = %args.iid, count = classes.classes_count, "event classes");
    for ((class_id, prog_id), description) in classes
        .class_ids
        .iter()
        .zip(&classes.prog_ids)
        .zip(&classes.descriptions)
    {
        info!(%class_id, %prog_id, %description, "event class");
    }

    match query
        .lookup_queue_v2(LookupQueueV2Request::new(QueueFilter::by_label(&args.label)), &opts)
        .await
    {
        Ok(found) => {
            let len = found.value.as_ref().map(|p| p.data.len()).unwrap_or(0);
            info!(label = %args.label, objref_len = len, "queue found");
        }
        Err(err) => warn!(label = %args.label, error = %err, "queue lookup failed"),
    }

    // IDispatch methods are inherited but not implemented by the directory
    if let Err(err) = query
        .dispatch()
        .get_type_info_count(dcom::idispatch::GetTypeInfoCountRequest::new(), &opts)
        .await
    {
        info!(error = %err, "GetTypeInfoCount");
    }

    info!(calls = conn.invocations(), "done");
    Ok(())
}
