//! gRPC service implementation

use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::application::ServiceHandler;
use crate::application::commands::*;
use crate::application::queries::*;
use crate::domain::repositories::LocationFilter;
use crate::proto::location_service_server::LocationService;
use crate::proto::*;

use super::conversions::*;

pub struct LocationServiceImpl {
    handler: Arc<ServiceHandler>,
}

impl LocationServiceImpl {
    pub fn new(handler: Arc<ServiceHandler>) -> Self {
        Self { handler }
    }
}

fn location_field(node: &crate::domain::entities::LocationNode) -> Option<Location> {
    Some(location_to_proto(node))
}

#[tonic::async_trait]
impl LocationService for LocationServiceImpl {
    // ========== 手工构建 ==========

    async fn create_zone(
        &self,
        request: Request<CreateZoneRequest>,
    ) -> Result<Response<CreateZoneResponse>, Status> {
        let operator = extract_operator(request.metadata())?;
        let req = request.into_inner();

        let cmd = CreateZoneCommand {
            warehouse_id: parse_warehouse_id(&req.warehouse_id)?,
            label: req.label,
            description: req.description,
            expected_code: non_blank(req.expected_code),
            operator,
        };
        let zone = self.handler.create_zone(cmd).await?;

        Ok(Response::new(CreateZoneResponse {
            location: location_field(&zone),
        }))
    }

    async fn create_aisle(
        &self,
        request: Request<CreateAisleRequest>,
    ) -> Result<Response<CreateAisleResponse>, Status> {
        let operator = extract_operator(request.metadata())?;
        let req = request.into_inner();

        let cmd = CreateAisleCommand {
            zone_id: parse_location_id(&req.zone_id, "zone ID")?,
            label: req.label,
            level_count: req.level_count,
            prepopulate_levels: req.prepopulate_levels,
            description: req.description,
            expected_code: non_blank(req.expected_code),
            operator,
        };
        let created = self.handler.create_aisle(cmd).await?;

        Ok(Response::new(CreateAisleResponse {
            location: location_field(&created.aisle),
            levels: created.levels.iter().map(location_to_proto).collect(),
        }))
    }

    async fn create_bin(
        &self,
        request: Request<CreateBinRequest>,
    ) -> Result<Response<CreateBinResponse>, Status> {
        let operator = extract_operator(request.metadata())?;
        let req = request.into_inner();

        let cmd = CreateBinCommand {
            aisle_id: parse_location_id(&req.aisle_id, "aisle ID")?,
            label: req.label,
            description: req.description,
            expected_code: non_blank(req.expected_code),
            operator,
        };
        let bin = self.handler.create_bin(cmd).await?;

        Ok(Response::new(CreateBinResponse {
            location: location_field(&bin),
        }))
    }

    async fn preview_code(
        &self,
        request: Request<PreviewCodeRequest>,
    ) -> Result<Response<PreviewCodeResponse>, Status> {
        let req = request.into_inner();
        let query = PreviewCodeQuery {
            parent_id: parse_optional_location_id(req.parent_id.as_deref(), "parent ID")?,
            label: req.label,
        };
        let code = self.handler.preview_code(query).await?;

        Ok(Response::new(PreviewCodeResponse { code }))
    }

    // ========== 库位维护 ==========

    async fn get_location(
        &self,
        request: Request<GetLocationRequest>,
    ) -> Result<Response<GetLocationResponse>, Status> {
        let req = request.into_inner();
        let query = GetLocationQuery {
            location_id: parse_location_id(&req.id, "location ID")?,
        };
        let node = self.handler.get_location(query).await?;

        Ok(Response::new(GetLocationResponse {
            location: location_field(&node),
        }))
    }

    async fn list_locations(
        &self,
        request: Request<ListLocationsRequest>,
    ) -> Result<Response<ListLocationsResponse>, Status> {
        let req = request.into_inner();

        let mut filter = LocationFilter::all();
        if let Some(depth) = depth_from_proto(req.depth)? {
            filter = filter.depth(depth);
        }
        if let Some(parent_id) = parse_optional_location_id(req.parent_id.as_deref(), "parent ID")? {
            filter = filter.parent(parent_id);
        }
        if let Some(zone) = non_blank(req.zone) {
            filter = filter.zone(zone);
        }
        if let Some(aisle) = non_blank(req.aisle) {
            filter = filter.aisle(aisle);
        }
        if let Some(is_active) = req.is_active {
            filter = filter.active(is_active);
        }

        let query = ListLocationsQuery {
            warehouse_id: parse_warehouse_id(&req.warehouse_id)?,
            filter,
        };
        let nodes = self.handler.list_locations(query).await?;

        Ok(Response::new(ListLocationsResponse {
            locations: nodes.iter().map(location_to_proto).collect(),
        }))
    }

    async fn set_location_active(
        &self,
        request: Request<SetLocationActiveRequest>,
    ) -> Result<Response<SetLocationActiveResponse>, Status> {
        let operator = extract_operator(request.metadata())?;
        let req = request.into_inner();

        let cmd = SetLocationActiveCommand {
            location_id: parse_location_id(&req.id, "location ID")?,
            is_active: req.is_active,
            operator,
        };
        let node = self.handler.set_location_active(cmd).await?;

        Ok(Response::new(SetLocationActiveResponse {
            location: location_field(&node),
        }))
    }

    async fn update_location_description(
        &self,
        request: Request<UpdateLocationDescriptionRequest>,
    ) -> Result<Response<UpdateLocationDescriptionResponse>, Status> {
        let operator = extract_operator(request.metadata())?;
        let req = request.into_inner();

        let cmd = UpdateLocationDescriptionCommand {
            location_id: parse_location_id(&req.id, "location ID")?,
            description: req.description,
            operator,
        };
        let node = self.handler.update_location_description(cmd).await?;

        Ok(Response::new(UpdateLocationDescriptionResponse {
            location: location_field(&node),
        }))
    }

    // ========== 布局 ==========

    async fn save_layout(
        &self,
        request: Request<SaveLayoutRequest>,
    ) -> Result<Response<SaveLayoutResponse>, Status> {
        let operator = extract_operator(request.metadata())?;
        let req = request.into_inner();

        let rects = req
            .rects
            .into_iter()
            .map(rect_from_proto)
            .collect::<Result<Vec<_>, _>>()?;
        let cmd = SaveLayoutCommand {
            warehouse_id: parse_warehouse_id(&req.warehouse_id)?,
            name: req.name,
            rects,
            operator,
        };
        let layout = self.handler.save_layout(cmd).await?;

        Ok(Response::new(SaveLayoutResponse {
            layout: Some(layout_to_proto(&layout)),
        }))
    }

    async fn get_layout(
        &self,
        request: Request<GetLayoutRequest>,
    ) -> Result<Response<GetLayoutResponse>, Status> {
        let req = request.into_inner();
        let query = GetLayoutQuery {
            warehouse_id: parse_warehouse_id(&req.warehouse_id)?,
        };
        let layout = self.handler.get_layout(query).await?;

        Ok(Response::new(GetLayoutResponse {
            layout: Some(layout_to_proto(&layout)),
        }))
    }

    async fn generate_locations_from_layout(
        &self,
        request: Request<GenerateLocationsFromLayoutRequest>,
    ) -> Result<Response<GenerateLocationsFromLayoutResponse>, Status> {
        let operator = extract_operator(request.metadata())?;
        let req = request.into_inner();

        let cmd = GenerateLocationsCommand {
            warehouse_id: parse_warehouse_id(&req.warehouse_id)?,
            operator,
        };
        let report = self.handler.generate_locations_from_layout(cmd).await?;

        Ok(Response::new(report_to_proto(&report)))
    }

    // ========== 级联选择 ==========
    //
    // 无法解析的仓库 ID 与未知仓库一样返回空列表

    async fn list_lots(
        &self,
        request: Request<ListLotsRequest>,
    ) -> Result<Response<ListLotsResponse>, Status> {
        let req = request.into_inner();
        let lots = match parse_warehouse_id(&req.warehouse_id) {
            Ok(warehouse_id) => self.handler.list_lots(ListLotsQuery { warehouse_id }).await,
            Err(_) => Vec::new(),
        };

        Ok(Response::new(ListLotsResponse { lots }))
    }

    async fn list_carts(
        &self,
        request: Request<ListCartsRequest>,
    ) -> Result<Response<ListCartsResponse>, Status> {
        let req = request.into_inner();
        let carts = match parse_warehouse_id(&req.warehouse_id) {
            Ok(warehouse_id) => {
                self.handler
                    .list_carts(ListCartsQuery {
                        warehouse_id,
                        lot: req.lot,
                    })
                    .await
            }
            Err(_) => Vec::new(),
        };

        Ok(Response::new(ListCartsResponse { carts }))
    }

    async fn list_levels(
        &self,
        request: Request<ListLevelsRequest>,
    ) -> Result<Response<ListLevelsResponse>, Status> {
        let req = request.into_inner();
        let levels = match parse_warehouse_id(&req.warehouse_id) {
            Ok(warehouse_id) => {
                self.handler
                    .list_levels(ListLevelsQuery {
                        warehouse_id,
                        lot: req.lot,
                        cart: req.cart,
                    })
                    .await
            }
            Err(_) => Vec::new(),
        };

        Ok(Response::new(ListLevelsResponse {
            levels: levels.into_iter().map(level_to_proto).collect(),
        }))
    }

    // ========== 树形展示 ==========

    async fn get_location_tree(
        &self,
        request: Request<GetLocationTreeRequest>,
    ) -> Result<Response<GetLocationTreeResponse>, Status> {
        let req = request.into_inner();
        let query = GetLocationTreeQuery {
            warehouse_id: parse_warehouse_id(&req.warehouse_id)?,
            include_inactive: req.include_inactive,
        };
        let forest = self.handler.get_location_tree(query).await?;

        Ok(Response::new(tree_to_proto(&forest)))
    }
}
