//! Quotations service.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use rand::thread_rng;
use smallvec::SmallVec;
use tracing::{Span, error, info, warn};

use crate::{
    auth::UserUuid,
    database::Db,
    domain::{
        carts::models::CartItem,
        orders::{
            PgOrdersRepository,
            data::{NewOrder, NewOrderLine},
            records::{OrderRecord, OrderStatus, OrderUuid, PaymentStatus},
        },
        quotations::{
            data::{
                CustomerContact, DEFAULT_CUSTOMER_CITY, NewQuotation, NewQuotationLine,
                QuotationResponse, ResponseArtifact, ResponseFormat,
            },
            errors::QuotationsServiceError,
            events::QuotationEventDetail,
            records::{CustomerInfo, QuotationRecord, QuotationStatus, QuotationUuid},
            repository::PgQuotationsRepository,
            tickets::{mint_quotation_ticket, order_ticket_from},
            whatsapp::{self, PricingSummary},
        },
        tenants::{TenantsService, errors::TenantsServiceError, records::TenantUuid},
    },
    render::{DocumentLine, DocumentRenderer, QuotationDocument},
};

/// Quotation lifecycle service backed by Postgres.
///
/// Also owns the orders repository: conversion writes the order and the
/// quotation link as one flow and nothing else creates orders.
#[derive(Clone)]
pub struct PgQuotationsService {
    db: Db,
    quotations: PgQuotationsRepository,
    orders: PgOrdersRepository,
    tenants: Arc<dyn TenantsService>,
    renderer: Arc<dyn DocumentRenderer>,
}

impl PgQuotationsService {
    #[must_use]
    pub fn new(
        db: Db,
        tenants: Arc<dyn TenantsService>,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        Self {
            db,
            quotations: PgQuotationsRepository::new(),
            orders: PgOrdersRepository::new(),
            tenants,
            renderer,
        }
    }

    /// Reads a quotation with its lines, without tenant scoping. Callers
    /// authorize before acting on the result.
    async fn load_quotation(
        &self,
        quotation: QuotationUuid,
    ) -> Result<QuotationRecord, QuotationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.quotations.get_quotation(&mut tx, quotation).await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Creates one quotation with its lines and intake event inside a
    /// single tenant transaction.
    async fn create_for_store(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        customer: &CustomerInfo,
        items: &[&CartItem],
    ) -> Result<QuotationRecord, QuotationsServiceError> {
        let lines: Vec<NewQuotationLine> = items
            .iter()
            .map(|item| NewQuotationLine {
                product_uuid: item.product_uuid,
                name: item.name.clone(),
                size: item.size.clone(),
                color: item.color.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                subtotal: item.subtotal(),
                image: item.image.clone(),
            })
            .collect();

        let subtotal = lines
            .iter()
            .fold(0u64, |total, line| total.saturating_add(line.subtotal));

        let quotation = NewQuotation {
            uuid: QuotationUuid::new(),
            ticket: mint_quotation_ticket(Timestamp::now(), &mut thread_rng()),
            user_uuid: user,
            customer: customer.clone(),
            lines,
            subtotal,
            discount: 0,
            total: subtotal,
        };

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self
            .quotations
            .create_quotation(&mut tx, &quotation)
            .await?;

        self.quotations
            .insert_event(
                &mut tx,
                record.uuid,
                Some(user),
                &QuotationEventDetail::Created {
                    item_count: record.lines.len(),
                    total: record.total,
                },
            )
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Marks a quotation contacted and stores the staff notes.
    async fn record_response(
        &self,
        quotation: QuotationUuid,
        notes: Option<&str>,
    ) -> Result<(), QuotationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        self.quotations
            .mark_contacted(&mut tx, quotation, notes)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Links a committed order back to its quotation and records the
    /// conversion event.
    async fn link_order(
        &self,
        tenant: TenantUuid,
        quotation: QuotationUuid,
        order: OrderUuid,
        user: UserUuid,
    ) -> Result<(), QuotationsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let rows_affected = self
            .quotations
            .mark_converted(&mut tx, quotation, order)
            .await?;

        if rows_affected == 0 {
            warn!(
                quotation_uuid = %quotation,
                order_uuid = %order,
                "quotation was converted concurrently, new order left unlinked",
            );

            return Err(QuotationsServiceError::AlreadyConverted);
        }

        self.quotations
            .insert_event(
                &mut tx,
                quotation,
                Some(user),
                &QuotationEventDetail::Converted {
                    order_uuid: order.into_uuid(),
                },
            )
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

/// Cart items grouped per store. Most carts touch one or two stores.
type StorePartitions<'a> = SmallVec<[(TenantUuid, Vec<&'a CartItem>); 2]>;

/// Groups cart items by store, preserving first-appearance order.
///
/// Items missing a store are attributed to the first store seen in the
/// cart; when no item names a store at all they are skipped.
fn partition_by_store(items: &[CartItem]) -> StorePartitions<'_> {
    let fallback = items.iter().find_map(|item| item.tenant_uuid);

    let mut partitions = StorePartitions::new();

    for item in items {
        let Some(tenant) = item.tenant_uuid.or(fallback) else {
            warn!(product_uuid = %item.product_uuid, "cart item names no store, skipping");
            continue;
        };

        match partitions.iter_mut().find(|(uuid, _)| *uuid == tenant) {
            Some((_, group)) => group.push(item),
            None => partitions.push((tenant, vec![item])),
        }
    }

    partitions
}

/// Builds the document handed to the PDF renderer.
fn quotation_document(
    record: &QuotationRecord,
    response: &QuotationResponse,
    summary: PricingSummary,
    valid_until: Timestamp,
) -> QuotationDocument {
    QuotationDocument {
        ticket: record.ticket.clone(),
        customer_name: record.customer.name.clone(),
        customer_phone: record.customer.phone.clone(),
        customer_email: record.customer.email.clone(),
        customer_city: record.customer.city.clone(),
        lines: response
            .lines
            .iter()
            .map(|line| DocumentLine {
                name: line.name.clone(),
                quantity: line.quantity,
                original_price: line.original_price,
                adjusted_price: line.adjusted_price,
                subtotal: line.adjusted_subtotal(),
            })
            .collect(),
        original_total: summary.original_total,
        adjusted_total: summary.adjusted_total,
        total_discount: summary.total_discount,
        discount_percentage: summary.discount_percentage,
        notes: response.notes.clone(),
        valid_until,
    }
}

#[async_trait]
impl QuotationsService for PgQuotationsService {
    #[tracing::instrument(
        name = "quotations.service.create_from_cart",
        skip(self, items, contact),
        fields(
            user_uuid = %user,
            item_count = items.len(),
            store_count = tracing::field::Empty
        ),
        err
    )]
    async fn create_from_cart(
        &self,
        user: UserUuid,
        items: Vec<CartItem>,
        contact: CustomerContact,
    ) -> Result<Vec<QuotationRecord>, QuotationsServiceError> {
        if items.is_empty() {
            return Err(QuotationsServiceError::EmptyCart);
        }

        if contact.name.trim().is_empty() || contact.phone.trim().is_empty() {
            return Err(QuotationsServiceError::MissingCustomerData);
        }

        let customer = CustomerInfo {
            name: contact.name,
            phone: contact.phone,
            email: contact.email,
            city: contact
                .city
                .filter(|city| !city.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CUSTOMER_CITY.to_string()),
        };

        let partitions = partition_by_store(&items);

        Span::current().record("store_count", partitions.len());

        let mut created = Vec::with_capacity(partitions.len());

        // Each store gets its own transaction. A failure part way
        // through leaves the earlier quotations in place and surfaces
        // the error to the caller.
        for (tenant, group) in partitions {
            let quotation = self
                .create_for_store(tenant, user, &customer, &group)
                .await?;

            info!(
                quotation_uuid = %quotation.uuid,
                tenant_uuid = %tenant,
                ticket = %quotation.ticket,
                "created quotation",
            );

            created.push(quotation);
        }

        Ok(created)
    }

    #[tracing::instrument(
        name = "quotations.service.respond",
        skip(self, response),
        fields(
            quotation_uuid = %response.quotation_uuid,
            format = response.format.as_str(),
            line_count = response.lines.len()
        ),
        err
    )]
    async fn respond(
        &self,
        response: QuotationResponse,
    ) -> Result<ResponseArtifact, QuotationsServiceError> {
        let record = self.load_quotation(response.quotation_uuid).await?;

        let summary = whatsapp::summarize(&response.lines);

        let valid_until = Timestamp::now()
            .saturating_add(SignedDuration::from_hours(
                i64::from(response.valid_days).saturating_mul(24),
            ))
            .unwrap_or(Timestamp::MAX);

        let artifact = match response.format {
            ResponseFormat::Whatsapp => {
                let message = whatsapp::render_message(
                    &record.ticket,
                    &record.customer.name,
                    &response.lines,
                    summary,
                    response.notes.as_deref(),
                    valid_until,
                );

                ResponseArtifact::Whatsapp {
                    url: whatsapp::deep_link(&record.customer.phone, &message),
                }
            }
            ResponseFormat::Pdf => {
                let document = quotation_document(&record, &response, summary, valid_until);

                let pdf = self.renderer.render_quotation_pdf(&document).await?;

                ResponseArtifact::Pdf {
                    base64: STANDARD.encode(pdf),
                    filename: format!("cotizacion-{}.pdf", record.ticket),
                }
            }
        };

        // The artifact already exists and the customer can still receive
        // it, so a failed status update downgrades to a warning.
        if let Err(error) = self
            .record_response(record.uuid, response.notes.as_deref())
            .await
        {
            warn!(
                quotation_uuid = %record.uuid,
                %error,
                "response artifact built but the quotation was not marked contacted",
            );
        }

        info!(quotation_uuid = %record.uuid, ticket = %record.ticket, "responded to quotation");

        Ok(artifact)
    }

    #[tracing::instrument(
        name = "quotations.service.convert",
        skip(self),
        fields(
            user_uuid = %user,
            quotation_uuid = %quotation,
            order_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn convert(
        &self,
        user: UserUuid,
        quotation: QuotationUuid,
    ) -> Result<OrderRecord, QuotationsServiceError> {
        let record = self.load_quotation(quotation).await?;

        if record.status == QuotationStatus::Converted {
            return Err(QuotationsServiceError::AlreadyConverted);
        }

        let authorized = self
            .tenants
            .user_can_manage(record.tenant_uuid, user)
            .await
            .map_err(QuotationsServiceError::Tenants)?;

        if !authorized {
            return Err(QuotationsServiceError::Forbidden);
        }

        let order = NewOrder {
            uuid: OrderUuid::new(),
            ticket: order_ticket_from(&record.ticket),
            customer_name: record.customer.name.clone(),
            customer_phone: record.customer.phone.clone(),
            customer_email: record.customer.email.clone(),
            customer_city: record.customer.city.clone(),
            lines: record
                .lines
                .iter()
                .map(|line| NewOrderLine {
                    product_uuid: line.product_uuid,
                    name: line.name.clone(),
                    size: line.size.clone(),
                    color: line.color.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    subtotal: line.subtotal,
                    image: line.image.clone(),
                })
                .collect(),
            subtotal: record.subtotal,
            discount: record.discount,
            total: record.total,
            status: OrderStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            paid_at: Some(Timestamp::now()),
        };

        let mut tx = self.db.begin_tenant_transaction(record.tenant_uuid).await?;

        let order = self.orders.create_order(&mut tx, &order).await?;

        tx.commit().await?;

        Span::current().record("order_uuid", tracing::field::display(order.uuid));

        // The order is committed at this point. If the link back to the
        // quotation fails the order survives unlinked, which operators
        // can repair from the log line below.
        if let Err(error) = self
            .link_order(record.tenant_uuid, record.uuid, order.uuid, user)
            .await
        {
            error!(
                quotation_uuid = %record.uuid,
                order_uuid = %order.uuid,
                %error,
                "order persisted but the quotation was not linked to it",
            );

            return Err(error);
        }

        info!(
            quotation_uuid = %record.uuid,
            order_uuid = %order.uuid,
            ticket = %order.ticket,
            "converted quotation to order",
        );

        Ok(order)
    }

    #[tracing::instrument(
        name = "quotations.service.mark_viewed",
        skip(self),
        fields(user_uuid = %user, tenant_uuid = tracing::field::Empty),
        err
    )]
    async fn mark_viewed(&self, user: UserUuid) -> Result<u64, QuotationsServiceError> {
        let tenant = self
            .tenants
            .find_for_user(user)
            .await
            .map_err(|error| match error {
                TenantsServiceError::NotFound => QuotationsServiceError::NotFound,
                other => QuotationsServiceError::Tenants(other),
            })?;

        Span::current().record("tenant_uuid", tracing::field::display(tenant.uuid));

        let mut tx = self.db.begin_tenant_transaction(tenant.uuid).await?;

        let rows_affected = self.quotations.mark_viewed_pending(&mut tx).await?;

        tx.commit().await?;

        info!(rows_affected, "marked pending quotations as viewed");

        Ok(rows_affected)
    }
}

#[automock]
#[async_trait]
/// Quotation lifecycle operations.
pub trait QuotationsService: Send + Sync {
    /// Creates one quotation per store represented in the cart. A
    /// failure after the first store leaves the earlier quotations in
    /// place.
    async fn create_from_cart(
        &self,
        user: UserUuid,
        items: Vec<CartItem>,
        contact: CustomerContact,
    ) -> Result<Vec<QuotationRecord>, QuotationsServiceError>;

    /// Builds the customer-facing artifact for a staff response and
    /// marks the quotation contacted. The artifact is returned even
    /// when the status update fails.
    async fn respond(
        &self,
        response: QuotationResponse,
    ) -> Result<ResponseArtifact, QuotationsServiceError>;

    /// Converts a quotation into a confirmed, paid order for the store
    /// that owns it.
    async fn convert(
        &self,
        user: UserUuid,
        quotation: QuotationUuid,
    ) -> Result<OrderRecord, QuotationsServiceError>;

    /// Stamps every pending, unseen quotation of the caller's store and
    /// returns how many were stamped.
    async fn mark_viewed(&self, user: UserUuid) -> Result<u64, QuotationsServiceError>;
}
