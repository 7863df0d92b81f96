//! Team-management endpoint bindings and their payload types.

// self
use crate::{
	_prelude::*,
	api::{ApiRequest, ApiResponse, routes},
	gateway::Gateway,
	http::GatewayTransport,
};

/// Team record returned by the list/create endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
	/// Unique team identifier.
	pub id: String,
	/// Team display name.
	pub name: String,
	/// Join code, when one has been assigned.
	#[serde(default)]
	pub code: Option<String>,
	/// Identifier of the owning user.
	#[serde(default)]
	pub owner_id: Option<String>,
}

/// Membership role within a team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemberRole {
	/// Full control.
	Owner,
	/// Manages the team and its members.
	Admin,
	/// Read-only access.
	Viewer,
}

/// Team member record returned by the members endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
	/// Invited or joined email address.
	pub email: String,
	/// Role held within the team.
	pub role: MemberRole,
	/// True once the member accepted their invitation.
	#[serde(default)]
	pub joined: bool,
}

/// Payload creating a team.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTeamRequest {
	/// Team display name.
	pub name: String,
	/// Join code chosen or autogenerated for the team.
	pub code: String,
}

/// Payload checking a join code for availability.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TeamCodeValidation {
	/// Candidate join code.
	pub code: String,
}

/// Payload inviting members into a team.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InviteMembersRequest {
	/// Target team identifier.
	pub team_id: String,
	/// Email addresses to invite.
	pub emails: Vec<String>,
}

impl<T> Gateway<T>
where
	T: ?Sized + GatewayTransport,
{
	/// Lists the teams visible to the current user.
	pub async fn list_teams(&self) -> Result<ApiResponse> {
		self.send(ApiRequest::get(routes::TEAMS)).await
	}

	/// Creates a team.
	pub async fn create_team(&self, team: &CreateTeamRequest) -> Result<ApiResponse> {
		self.send(ApiRequest::post_json(routes::TEAMS, team)?).await
	}

	/// Requests a server-generated join code.
	pub async fn autogenerate_team_code(&self) -> Result<ApiResponse> {
		self.send(ApiRequest::get(routes::TEAMS_AUTOGENERATE_CODE)).await
	}

	/// Checks a join code for availability.
	pub async fn validate_team_code(&self, code: &TeamCodeValidation) -> Result<ApiResponse> {
		self.send(ApiRequest::post_json(routes::TEAMS_VALIDATE_CODE, code)?).await
	}

	/// Fetches a single team.
	pub async fn team(&self, team_id: &str) -> Result<ApiResponse> {
		self.send(ApiRequest::get(routes::team(team_id))).await
	}

	/// Deletes a team.
	pub async fn delete_team(&self, team_id: &str) -> Result<ApiResponse> {
		self.send(ApiRequest::delete(routes::team(team_id))).await
	}

	/// Lists the members of a team.
	pub async fn team_members(&self, team_id: &str) -> Result<ApiResponse> {
		self.send(ApiRequest::get(routes::team_members(team_id))).await
	}

	/// Invites members into a team.
	pub async fn invite_members(&self, invitation: &InviteMembersRequest) -> Result<ApiResponse> {
		self.send(ApiRequest::post_json(routes::TEAMS_INVITE, invitation)?).await
	}

	/// Accepts an emailed invitation identified by its `team_code` token.
	pub async fn accept_invite(&self, team_code: &str) -> Result<ApiResponse> {
		self.send(ApiRequest::get(routes::accept_invite(team_code))).await
	}
}
