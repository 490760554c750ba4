use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{CheckinStatus, MeetingStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::member::get_members,
        handlers::member::create_member,
        handlers::member::update_member,
        handlers::member::delete_member,
        handlers::checkin::check_in,
        handlers::checkin::get_checkins,
        handlers::checkin::delete_checkin,
        handlers::meeting::get_meetings,
        handlers::meeting::upsert_meeting,
        handlers::meeting::update_meeting,
        handlers::meeting::delete_meeting,
        handlers::prize::get_prizes,
        handlers::prize::create_prize,
        handlers::prize::update_prize,
        handlers::prize::delete_prize,
        handlers::lottery::draw,
        handlers::lottery::get_winners,
        handlers::sync::test_sheets,
        handlers::sync::sync_sheets,
    ),
    components(
        schemas(
            ApiError,
            AdminLoginRequest,
            AdminLoginResponse,
            MemberResponse,
            CreateMemberRequest,
            UpdateMemberRequest,
            DeleteResult,
            CheckinRequest,
            CheckinListQuery,
            CheckinListResponse,
            CheckinResponse,
            CheckinStatus,
            DeleteCheckinRequest,
            MeetingResponse,
            UpsertMeetingRequest,
            UpdateMeetingRequest,
            MeetingStatus,
            PrizeResponse,
            CreatePrizeRequest,
            UpdatePrizeRequest,
            DrawRequest,
            DrawResponse,
            DrawnPrize,
            DrawnWinner,
            WinnerListQuery,
            WinnerResponse,
            SheetsSyncResponse,
            SheetsTestResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "管理员登录"),
        (name = "member", description = "会员管理"),
        (name = "checkin", description = "签到"),
        (name = "meeting", description = "会议管理"),
        (name = "prize", description = "奖品管理"),
        (name = "lottery", description = "抽奖"),
        (name = "sync", description = "Google Sheets 同步"),
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
