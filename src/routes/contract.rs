//! Contract route handlers
//!
//! Contract lists are page-addressed (`page`/`limit`) and report page
//! bookkeeping next to the items.

use super::{done, ok, Reply};
use crate::auth::CurrentAdmin;
use crate::error::AppError;
use crate::extract::{AppQuery, RequestId};
use crate::models::{Contract, CreateContractParams, ListData, MemberSummary};
use crate::query::{execute, ListQuery, PageMeta, Pagination, Searchable};
use crate::state::{AppState, SharedState};
use crate::store::RecordKey;
use crate::uploads::store_image_field;
use axum::extract::{multipart::MultipartRejection, Multipart, Path, State};
use tracing::{debug, info};
use validator::Validate;

fn page_of(state: &AppState, records: Vec<Contract>, query: &ListQuery) -> ListData<Contract> {
    let paging = &state.config.paging;
    let pagination = Pagination::from_page_query(query, paging.default_limit, paging.max_limit);
    let page = execute(records, &Contract::filter(query), pagination);
    let meta = PageMeta::new(pagination, page.total);
    ListData::new(Contract::COLLECTION, page).with_meta(meta)
}

/// GET /api/admin/contracts
pub async fn list_contracts(
    State(state): State<SharedState>,
    request_id: RequestId,
    AppQuery(query): AppQuery<ListQuery>,
) -> Reply<ListData<Contract>> {
    let data = page_of(&state, state.contracts.list().await?, &query);
    ok(data, request_id)
}

/// GET /api/admin/contracts/user/{uid}
///
/// An unknown member has no contracts rather than being an error.
pub async fn list_member_contracts(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(uid): Path<String>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Reply<ListData<Contract>> {
    let records = match state.members.get(&RecordKey::new(uid.as_str())).await {
        Ok(member) => state
            .contracts
            .list()
            .await?
            .into_iter()
            .filter(|c| c.user_id == member.id)
            .collect(),
        Err(AppError::NotFound(_)) => {
            debug!("No member '{}', returning no contracts", uid);
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    ok(page_of(&state, records, &query), request_id)
}

/// POST /api/admin/contracts
///
/// Metadata comes in the query string, the scanned contract as the
/// multipart field `contract_image`. Metadata is checked before the upload
/// is read so a rejected request writes nothing.
pub async fn create_contract(
    State(state): State<SharedState>,
    CurrentAdmin(admin_id): CurrentAdmin,
    request_id: RequestId,
    AppQuery(params): AppQuery<CreateContractParams>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Reply<Contract> {
    params.validate()?;
    let multipart = multipart?;

    let uid = params.uid.clone().unwrap_or_default();
    let member = state.members.get(&RecordKey::new(uid)).await?;

    let image = store_image_field(
        multipart,
        "contract_image",
        &state.config.storage.upload_dir,
        "contracts",
    )
    .await?;

    let contract = state
        .contracts
        .create(params.into_record(MemberSummary::from(&member), image, admin_id))
        .await?;
    info!(
        "Contract {} filed for member {} by admin {}",
        contract.id, member.id, admin_id
    );
    ok(contract, request_id)
}

/// GET /api/admin/contracts/{contract_id}
pub async fn get_contract(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(contract_id): Path<String>,
) -> Reply<Contract> {
    ok(state.contracts.get(&RecordKey::new(contract_id)).await?, request_id)
}

/// DELETE /api/admin/contracts/{contract_id}
///
/// The stored image is left on disk.
pub async fn delete_contract(
    State(state): State<SharedState>,
    request_id: RequestId,
    Path(contract_id): Path<String>,
) -> Reply<()> {
    let removed = state.contracts.delete(&RecordKey::new(contract_id)).await?;
    info!("Contract deleted: {}", removed.id);
    done(request_id)
}
