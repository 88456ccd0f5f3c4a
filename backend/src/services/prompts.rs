//! Prompt templates sent to the language model.
//!
//! Both templates carry a single `{DATA}` marker that is replaced with the
//! pretty-printed JSON of the submitted records.

pub const DATA_MARKER: &str = "{DATA}";

pub const NARRATIVE_PROMPT: &str = r#"## 역할
당신은 검색광고 경쟁 분석을 담당하는 시니어 퍼포먼스 마케팅 전략가입니다.

## 목적
시간대별 경쟁사 광고 순위 데이터를 분석하여 매체(PC/Mobile)별 경쟁 구도와 입찰 기회를 요약한 리포트를 작성하세요.

## 입력 데이터
{DATA}

## 분석 가이드라인
1. 전체 분석: 광고주 수, 평균 순위, 순위 분포로 시장 전체의 경쟁 상태를 진단.
2. 매체 비대칭: 같은 광고주의 PC와 Mobile 순위 차이가 큰 경우를 찾아 의미를 해석.
3. 순위 변동: 순위 변화가 큰 경쟁사를 그룹으로 묶어 변동 패턴을 설명.
4. 최적 입찰시간대: 경쟁이 약하거나 경쟁사가 이탈하는 시간대를 구간별로 제시.
5. 입찰 전략: 위 분석을 근거로 실행 가능한 입찰 전략을 제안.

## 제약사항
- 반드시 JSON 형식으로만 출력.
- 각 문장은 "현상 -> 해석 -> 제안" 흐름의 개조식으로 작성.
- 시간은 '오전 9시', '오후 2시'처럼 읽기 쉬운 표현을 사용.
- 순위 변동폭, 업체 수 등 구체적인 수치를 근거로 포함.

## 출력 형식 (Strictly JSON)
{
  "overall_health": ["...", "..."],
  "media_asymmetry": ["...", "..."],
  "competitor_dynamics": {
    "그룹명": ["...", "..."]
  },
  "golden_time": {
    "구간명": "..."
  },
  "action_items": ["...", "..."]
}"#;

pub const RANK_SCHEDULE_PROMPT: &str = r#"## 역할
당신은 광고 순위 데이터로 경쟁사의 예산 한계와 입찰 공백을 찾아내는 시니어 퍼포먼스 마케팅 전략가입니다.

## 목적
제공된 데이터로 시간대별 경쟁 강도를 분석하고, 최소 비용으로 최대 노출 효율을 내는 시간대별 목표 순위를 산출하세요.

## 입력 데이터
{DATA}

## 산출 가이드라인
1. 경쟁 밀도: 특정 시간대에 노출되는 광고주 수가 많을수록 경쟁이 강함.
2. 변동성: 경쟁사 순위의 표준편차가 클수록 입찰이 불안정한 공략 시점.
3. 목표 순위 결정:
   - 경쟁 밀도 높음 + 변동성 낮음 = 보수적 운영
   - 경쟁 밀도 낮음 + 변동성 높음 = 공격적 운영
   - 경쟁사 이탈 구간 = 낮은 비용으로 상위 점유 기회

## 결과 요구사항
1. optimalRankSchedule: 시간대별 추천 목표 순위.
2. optimalRankScheduleReason: 데이터 근거 중심의 산정 이유.

## 제약사항
- 반드시 JSON 형식으로만 출력.
- 목표 순위는 정수만 기입.
- 구체적인 수치(순위 변동폭, 업체 수 등)를 근거로 포함.

## 출력 형식 (Strictly JSON)
{
  "optimalRankSchedule": {
    "hour00": "목표 순위",
    "hour01": "목표 순위",
    "...": "...",
    "hour23": "목표 순위"
  },
  "optimalRankScheduleReason": ["...", "...", "..."]
}"#;
