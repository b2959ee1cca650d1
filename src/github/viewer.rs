use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::github::client::{execute, GraphqlTransport};

const VIEWER_LOGIN_QUERY: &str = r#"
query ViewerLogin {
    viewer {
        login
    }
}
"#;

const TEAM_MEMBERS_QUERY: &str = r#"
query TeamMembers($org: String!, $team: String!) {
    organization(login: $org) {
        team(slug: $team) {
            members(first: 100) {
                nodes {
                    login
                }
            }
        }
    }
}
"#;

const VIEWER_ORGS_QUERY: &str = r#"
query ViewerOrgs {
    viewer {
        organizations(first: 100) {
            nodes {
                login
            }
        }
    }
}
"#;

const VIEWER_TEAMS_QUERY: &str = r#"
query ViewerTeams($org: String!, $login: String!) {
    organization(login: $org) {
        teams(first: 100, userLogins: [$login]) {
            nodes {
                slug
                name
            }
        }
    }
}
"#;

/// A team the viewer belongs to. `slug` is what `--team` expects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamSummary {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ViewerData {
    viewer: Login,
}

#[derive(Debug, Deserialize)]
struct Login {
    login: String,
}

#[derive(Debug, Deserialize)]
struct TeamMembersData {
    organization: Option<Organization>,
}

#[derive(Debug, Deserialize)]
struct Organization {
    team: Option<Team>,
}

#[derive(Debug, Deserialize)]
struct Team {
    members: LoginConnection,
}

#[derive(Debug, Deserialize)]
struct ViewerOrgsData {
    viewer: ViewerOrgs,
}

#[derive(Debug, Deserialize)]
struct ViewerOrgs {
    organizations: LoginConnection,
}

#[derive(Debug, Deserialize)]
struct LoginConnection {
    nodes: Vec<Option<Login>>,
}

#[derive(Debug, Deserialize)]
struct ViewerTeamsData {
    organization: Option<TeamsOrganization>,
}

#[derive(Debug, Deserialize)]
struct TeamsOrganization {
    teams: TeamConnection,
}

#[derive(Debug, Deserialize)]
struct TeamConnection {
    nodes: Vec<Option<TeamSummary>>,
}

fn decode<T: DeserializeOwned>(data: Value, what: &str) -> Result<T> {
    serde_json::from_value(data).map_err(|e| Error::Decode(format!("Unable to decode {}: {}", what, e)))
}

/// Login of the user the token belongs to.
pub async fn fetch_viewer_login(transport: &dyn GraphqlTransport, deadline: Duration) -> Result<String> {
    let payload = json!({ "query": VIEWER_LOGIN_QUERY, "variables": {} });
    let data = execute(transport, &payload, deadline).await?;
    let viewer: ViewerData = decode(data, "viewer")?;
    Ok(viewer.viewer.login)
}

/// Logins of the organizations the viewer belongs to.
pub async fn fetch_viewer_orgs(transport: &dyn GraphqlTransport, deadline: Duration) -> Result<Vec<String>> {
    let payload = json!({ "query": VIEWER_ORGS_QUERY, "variables": {} });
    let data = execute(transport, &payload, deadline).await?;
    let orgs: ViewerOrgsData = decode(data, "organizations")?;

    Ok(orgs
        .viewer
        .organizations
        .nodes
        .into_iter()
        .flatten()
        .map(|org| org.login)
        .collect())
}

/// Teams in `org` that `login` is a member of.
pub async fn fetch_viewer_teams(
    transport: &dyn GraphqlTransport,
    login: &str,
    org: &str,
    deadline: Duration,
) -> Result<Vec<TeamSummary>> {
    let payload = json!({
        "query": VIEWER_TEAMS_QUERY,
        "variables": { "org": org, "login": login },
    });
    let data = execute(transport, &payload, deadline).await?;
    let teams: ViewerTeamsData = decode(data, "teams")?;

    let organization = teams
        .organization
        .ok_or_else(|| Error::Protocol(format!("organization '{}' not found", org)))?;

    Ok(organization.teams.nodes.into_iter().flatten().collect())
}

/// Logins of the members of `org/team`, in the order GitHub lists them.
pub async fn fetch_team_members(
    transport: &dyn GraphqlTransport,
    org: &str,
    team: &str,
    deadline: Duration,
) -> Result<Vec<String>> {
    let payload = json!({
        "query": TEAM_MEMBERS_QUERY,
        "variables": { "org": org, "team": team },
    });
    let data = execute(transport, &payload, deadline).await?;
    let members: TeamMembersData = decode(data, "team members")?;

    let team_data = members
        .organization
        .ok_or_else(|| Error::Protocol(format!("organization '{}' not found", org)))?
        .team
        .ok_or_else(|| Error::Protocol(format!("team '{}/{}' not found", org, team)))?;

    Ok(team_data
        .members
        .nodes
        .into_iter()
        .flatten()
        .map(|member| member.login)
        .collect())
}
